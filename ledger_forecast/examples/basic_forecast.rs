use ledger_forecast::cashflow::CashFlowProjector;
use ledger_forecast::{
    AccuracyEvaluator, BudgetVarianceAnalyzer, CashFlowConfig, EnsembleAdapter, ForecastMethod,
    MonthlySeries, Period, SeriesForecaster, TrendAnalyzer,
};
use std::collections::BTreeMap;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Ledger Forecast: Basic Forecasting Example");
    println!("==========================================\n");

    let start = Period::new(2023, 1)?;
    let revenue = MonthlySeries::from_values(start, &sample_revenue())?;
    let expenses = MonthlySeries::from_values(start, &sample_expenses())?;
    println!(
        "Sample data: {} months from {} to {}\n",
        revenue.len(),
        start,
        revenue.last_period().unwrap_or(start)
    );

    let forecaster = SeriesForecaster::new();
    for method in ForecastMethod::ALL {
        println!("{} forecast:", method);
        for point in forecaster.forecast_series(&revenue, 3, method) {
            let label = point.period.map(|p| p.to_string()).unwrap_or_default();
            println!(
                "  {}: {:.2} ({:.2}, {:.2}) confidence {:.2}",
                label, point.predicted_value, point.lower_bound, point.upper_bound, point.confidence
            );
        }
    }

    let analyzer = TrendAnalyzer::new();
    let trend = analyzer.analyze(&revenue.values());
    println!(
        "\nTrend: {:?}, growth {:.1}%, average {:.2}, volatility {:.2}",
        trend.direction, trend.growth_rate_percent, trend.average, trend.volatility
    );
    println!("Seasonality: {:?}", analyzer.detect_seasonality(&revenue.values()));

    let accuracy = AccuracyEvaluator::new().evaluate(&revenue.values(), 3);
    println!("\nHoldout accuracy (last 3 months): {}", accuracy);

    let mut ensemble = EnsembleAdapter::new();
    ensemble.train(&revenue.values());
    println!("\nEnsemble availability: {:?}", ensemble.availability());
    for point in ensemble.forecast(&revenue.values(), 3) {
        println!("  step {}: {:.2} [{}]", point.step, point.predicted_value, point.model);
    }

    let config = CashFlowConfig {
        opening_balance: 20_000.0,
        ..CashFlowConfig::default()
    };
    let projection = CashFlowProjector::new(config).project(
        &forecaster.forecast_series(&revenue, 6, ForecastMethod::Seasonal),
        &forecaster.forecast_series(&expenses, 6, ForecastMethod::LinearRegression),
    );
    println!("\nCash flow:");
    for point in &projection.points {
        println!("  step {}: net {:.2}, balance {:.2}", point.step, point.net, point.balance);
    }
    println!("Runway: {:?}", projection.runway());

    let budget = BTreeMap::from([
        ("sales".to_string(), 14_000.0),
        ("rent".to_string(), 4_000.0),
    ]);
    let actual = BTreeMap::from([
        ("sales".to_string(), 13_250.0),
        ("rent".to_string(), 3_900.0),
    ]);
    println!("\nBudget variance:");
    for entry in BudgetVarianceAnalyzer::new().analyze(&budget, &actual) {
        println!(
            "  {}: {:+.2} ({:+.1}%) {}",
            entry.category,
            entry.variance,
            entry.variance_percent,
            if entry.is_favorable { "favorable" } else { "unfavorable" }
        );
    }

    Ok(())
}

/// Two years of revenue with growth and a year-end peak
fn sample_revenue() -> Vec<f64> {
    (0..24)
        .map(|i| {
            let seasonal = if i % 12 >= 10 { 2_500.0 } else { 0.0 };
            10_000.0 + 150.0 * i as f64 + seasonal
        })
        .collect()
}

/// Two years of slowly rising expenses
fn sample_expenses() -> Vec<f64> {
    (0..24).map(|i| 9_000.0 + 120.0 * i as f64).collect()
}
