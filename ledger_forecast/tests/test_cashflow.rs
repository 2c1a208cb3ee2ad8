use approx::assert_abs_diff_eq;
use ledger_forecast::cashflow::{
    runway, CashFlowCategory, CashFlowProjector, JitterSeeding, LedgerCategory, Runway,
};
use ledger_forecast::data::Period;
use ledger_forecast::{CashFlowConfig, ForecastPoint};
use rstest::rstest;

fn flat(value: f64, periods: usize) -> Vec<ForecastPoint> {
    (1..=periods)
        .map(|step| ForecastPoint::new(step, value, 0.0, 0.95, "test"))
        .collect()
}

fn config(opening_balance: f64) -> CashFlowConfig {
    CashFlowConfig {
        opening_balance,
        ..CashFlowConfig::default()
    }
}

#[rstest]
#[case("Sales", LedgerCategory::Sales, CashFlowCategory::Operating)]
#[case("payroll", LedgerCategory::Payroll, CashFlowCategory::Operating)]
#[case("equipment", LedgerCategory::Equipment, CashFlowCategory::Investing)]
#[case("loan-proceeds", LedgerCategory::LoanProceeds, CashFlowCategory::Financing)]
#[case("owner contribution", LedgerCategory::OwnerContribution, CashFlowCategory::Financing)]
#[case("travel", LedgerCategory::Other, CashFlowCategory::Operating)]
fn test_category_mapping(
    #[case] name: &str,
    #[case] category: LedgerCategory,
    #[case] section: CashFlowCategory,
) {
    assert_eq!(LedgerCategory::from_name(name), category);
    assert_eq!(category.cash_flow_category(), section);
}

#[test]
fn test_runway() {
    assert_eq!(runway(1000.0, 0.0), Runway::Infinite);
    assert_eq!(runway(1000.0, 50.0), Runway::Infinite);
    assert_eq!(runway(1000.0, -250.0), Runway::Months(4.0));
    assert_eq!(runway(-10.0, -250.0), Runway::Months(0.0));
}

#[test]
fn test_projection_running_balance() {
    let projector = CashFlowProjector::new(config(1000.0));
    let projection = projector.project(&flat(500.0, 3), &flat(800.0, 3));

    let balances: Vec<f64> = projection.points.iter().map(|p| p.balance).collect();
    assert_eq!(balances, vec![700.0, 400.0, 100.0]);
    assert_eq!(projection.closing_balance(), 100.0);
    assert_eq!(projection.average_net(), -300.0);

    match projection.runway() {
        Runway::Months(months) => assert_abs_diff_eq!(months, 1000.0 / 300.0, epsilon = 1e-9),
        Runway::Infinite => panic!("expected a finite runway"),
    }
    assert!(projection.first_shortfall().is_none());
}

#[test]
fn test_shorter_forecast_is_padded() {
    let projection = CashFlowProjector::new(config(0.0)).project(&flat(100.0, 1), &flat(40.0, 3));

    assert_eq!(projection.points.len(), 3);
    assert_eq!(projection.points[1].inflow, 0.0);
    assert_eq!(projection.points[2].balance, -20.0);
    assert_eq!(projection.first_shortfall().map(|p| p.step), Some(3));
}

#[test]
fn test_periods_carry_over() {
    let period = Period::new(2024, 12).unwrap();
    let revenue = vec![ForecastPoint::new(1, 10.0, 0.0, 0.95, "test").with_period(period)];

    let projection = CashFlowProjector::default().project(&revenue, &[]);
    assert_eq!(projection.points[0].period, Some(period));
}

#[rstest]
#[case(JitterSeeding::SingleStream)]
#[case(JitterSeeding::PerStep)]
fn test_jitter_is_bounded_and_reproducible(#[case] seeding: JitterSeeding) {
    let jittered = CashFlowConfig {
        jitter: true,
        jitter_percent: 0.05,
        seed: 7,
        seeding,
        ..CashFlowConfig::default()
    };
    let projector = CashFlowProjector::new(jittered);

    let first = projector.project(&flat(1000.0, 12), &flat(600.0, 12));
    let second = projector.project(&flat(1000.0, 12), &flat(600.0, 12));
    assert_eq!(first, second);

    for point in &first.points {
        assert!(point.inflow >= 950.0 - 1e-9 && point.inflow <= 1050.0 + 1e-9);
        assert!(point.outflow >= 570.0 - 1e-9 && point.outflow <= 630.0 + 1e-9);
    }
}
