use approx::assert_abs_diff_eq;
use chrono::NaiveDate;
use ledger_forecast::data::{aggregate_monthly, DataLoader, MonthlySeries, Period, SeriesPoint};
use ledger_forecast::ForecastError;
use pretty_assertions::assert_eq;
use std::io::Write;
use tempfile::NamedTempFile;

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

#[test]
fn test_period_parsing_and_display() {
    let period: Period = "2024-03".parse().unwrap();
    assert_eq!(period.year(), 2024);
    assert_eq!(period.month(), 3);
    assert_eq!(period.to_string(), "2024-03");

    let from_date: Period = "2024-03-17".parse().unwrap();
    assert_eq!(from_date, period);

    assert!("2024-13".parse::<Period>().is_err());
    assert!("March 2024".parse::<Period>().is_err());
    assert!(Period::new(2024, 0).is_err());
}

#[test]
fn test_period_succession() {
    let december = Period::new(2023, 12).unwrap();
    assert_eq!(december.succ(), Period::new(2024, 1).unwrap());

    let following: Vec<String> = december.following(3).iter().map(|p| p.to_string()).collect();
    assert_eq!(following, vec!["2024-01", "2024-02", "2024-03"]);

    assert_eq!(december.first_day(), Some(date("2023-12-01")));
}

#[test]
fn test_period_serializes_as_string() {
    let period = Period::new(2024, 7).unwrap();
    let json = serde_json::to_string(&period).unwrap();
    assert_eq!(json, "\"2024-07\"");

    let back: Period = serde_json::from_str(&json).unwrap();
    assert_eq!(back, period);
}

#[test]
fn test_series_rejects_unordered_periods() {
    let jan = Period::new(2024, 1).unwrap();
    let feb = Period::new(2024, 2).unwrap();

    let duplicate = MonthlySeries::new(vec![SeriesPoint::new(jan, 1.0), SeriesPoint::new(jan, 2.0)]);
    assert!(matches!(duplicate, Err(ForecastError::DataError(_))));

    let descending = MonthlySeries::new(vec![SeriesPoint::new(feb, 1.0), SeriesPoint::new(jan, 2.0)]);
    assert!(descending.is_err());

    let not_finite = MonthlySeries::new(vec![SeriesPoint::new(jan, f64::NAN)]);
    assert!(not_finite.is_err());
}

#[test]
fn test_series_from_values() {
    let series = MonthlySeries::from_values(Period::new(2024, 11).unwrap(), &[1.0, 2.0, 3.0]).unwrap();

    assert_eq!(series.len(), 3);
    assert_eq!(series.values(), vec![1.0, 2.0, 3.0]);
    assert_eq!(series.last_period(), Some(Period::new(2025, 1).unwrap()));
}

#[test]
fn test_aggregate_monthly_fills_gaps() {
    let entries = vec![
        (date("2024-01-05"), 100.0),
        (date("2024-01-20"), 50.0),
        (date("2024-03-02"), 75.0),
    ];

    let series = aggregate_monthly(&entries).unwrap();

    let periods: Vec<String> = series.periods().iter().map(|p| p.to_string()).collect();
    assert_eq!(periods, vec!["2024-01", "2024-02", "2024-03"]);
    assert_eq!(series.values(), vec![150.0, 0.0, 75.0]);

    assert!(aggregate_monthly(&[]).unwrap().is_empty());
}

#[test]
fn test_load_from_csv_file() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "date,amount").unwrap();
    writeln!(file, "2024-02-14, 1200.50").unwrap();
    writeln!(file, "2024-01-03,1000").unwrap();
    writeln!(file, "2024-02-28,-200.50").unwrap();
    file.flush().unwrap();

    let series = DataLoader::from_csv(file.path()).unwrap();

    assert_eq!(series.len(), 2);
    assert_eq!(series.first_period(), Some(Period::new(2024, 1).unwrap()));
    assert_abs_diff_eq!(series.values()[1], 1000.0, epsilon = 1e-9);
}

#[test]
fn test_load_monthly_csv_from_reader() {
    let csv = "date,amount\n2023-11,10\n2023-12,20\n2024-01,30\n";
    let series = DataLoader::from_reader(csv.as_bytes()).unwrap();

    assert_eq!(series.values(), vec![10.0, 20.0, 30.0]);
}

#[test]
fn test_load_rejects_bad_rows() {
    let bad_date = "date,amount\nyesterday,10\n";
    assert!(DataLoader::from_reader(bad_date.as_bytes()).is_err());

    let bad_amount = "date,amount\n2024-01,ten\n";
    assert!(matches!(
        DataLoader::from_reader(bad_amount.as_bytes()),
        Err(ForecastError::CsvError(_))
    ));
}

#[test]
fn test_missing_file() {
    let result = DataLoader::from_csv("/nonexistent/ledger.csv");
    assert!(matches!(result, Err(ForecastError::IoError(_))));
}

#[test]
fn test_period_year_must_be_representable() {
    assert!(matches!(Period::new(i32::MAX, 12), Err(ForecastError::InvalidParameter(_))));
    assert!("2000000000-01".parse::<Period>().is_err());

    let late = Period::new(262_000, 12).unwrap();
    assert_eq!(late.succ(), Period::new(262_001, 1).unwrap());
}

#[test]
fn test_months_since() {
    let start = Period::new(2023, 11).unwrap();
    assert_eq!(Period::new(2024, 2).unwrap().months_since(&start), 3);
    assert_eq!(start.months_since(&Period::new(2024, 2).unwrap()), -3);
    assert_eq!(start.months_since(&start), 0);
}

#[test]
fn test_aggregation_rejects_excessive_span() {
    let csv = "date,amount\n1-01,10.0\n2000000000-01,20.0\n";
    assert!(DataLoader::from_reader(csv.as_bytes()).is_err());

    let csv = "date,amount\n1900-01,10.0\n2100-01,20.0\n";
    let result = DataLoader::from_reader(csv.as_bytes());
    assert!(matches!(result, Err(ForecastError::DataError(_))));

    let result = aggregate_monthly(&[(date("1900-01-15"), 1.0), (date("2000-01-15"), 2.0)]);
    assert!(matches!(result, Err(ForecastError::DataError(_))));

    let series = aggregate_monthly(&[(date("1950-01-15"), 1.0), (date("2049-12-15"), 2.0)]).unwrap();
    assert_eq!(series.len(), 1200);
}
