//! Integration tests.
//!
//! Cover:
//! - Full pipeline with a mock data port (no files)
//! - Full pipeline over CSV fixtures in a temp directory, output re-read
//! - Leveraged series behavior through the whole pipeline
//! - Monthly schedule across month boundaries and the fallback rule
//! - Ingestion validation failures surface before simulation
//! - Integrity check over gappy fixtures

mod common;

use common::*;
use dcasim::adapters::csv_adapter::CsvAdapter;
use dcasim::domain::error::DcasimError;
use dcasim::domain::integrity::check_series;
use dcasim::domain::run::run_simulation;
use dcasim::domain::simulate::DcaPolicy;
use dcasim::domain::summary::RunSummary;
use dcasim::domain::validation::validate_series;
use dcasim::ports::data_port::DataPort;
use std::fs;
use tempfile::TempDir;

fn policy() -> DcaPolicy {
    DcaPolicy {
        contribution: 1000.0,
        target_day: 26,
    }
}

mod full_pipeline {
    use super::*;

    #[test]
    fn mock_port_to_summary() {
        let bars = vec![
            make_bar("2021-01-25", 100.0, None),
            make_bar("2021-01-26", 100.0, Some(0.0)),
            make_bar("2021-02-10", 90.0, Some(-10.0)),
            make_bar("2021-02-26", 99.0, Some(10.0)),
        ];
        let port = MockDataPort::new().with_bars("QQQ", bars);

        let fetched = port.fetch_daily("QQQ", None, None).unwrap();
        let validated = validate_series(fetched, "QQQ").unwrap();
        let run = run_simulation(validated, policy(), 3.0).unwrap();
        let summary = RunSummary::compute(&run);

        assert_eq!(summary.investment_months, 2);
        assert!((summary.base.total_invested - 2000.0).abs() < 1e-9);

        // January buys 10 shares at 100; February adds 1000/99.
        let shares = 10.0 + 1000.0 / 99.0;
        assert!((summary.base.final_value - shares * 99.0).abs() < 1e-9);
    }

    #[test]
    fn mock_port_date_range_filter() {
        let bars = vec![
            make_bar("2021-01-26", 100.0, None),
            make_bar("2021-02-26", 100.0, Some(0.0)),
            make_bar("2021-03-26", 100.0, Some(0.0)),
        ];
        let port = MockDataPort::new().with_bars("QQQ", bars);

        let fetched = port
            .fetch_daily("QQQ", Some(date(2021, 2, 1)), Some(date(2021, 2, 28)))
            .unwrap();
        assert_eq!(fetched.len(), 1);
        assert_eq!(fetched[0].date, date(2021, 2, 26));
    }

    #[test]
    fn mock_port_error_propagates() {
        let port = MockDataPort::new().with_error("QQQ", "source unavailable");
        let err = port.fetch_daily("QQQ", None, None).unwrap_err();
        assert!(matches!(err, DcasimError::Data { .. }));
    }

    #[test]
    fn csv_fixture_to_augmented_output() {
        let dir = TempDir::new().unwrap();
        let base = dir.path().to_path_buf();
        fs::write(
            base.join("QQQ_daily.csv"),
            "date,open,high,low,close,volume,return_pct\n\
             2021-01-25,99.5,101.0,99.0,100.0,1000,\n\
             2021-01-26,99.5,101.0,99.0,100.0,1000,0.0\n\
             2021-02-26,109.5,111.0,109.0,110.0,1000,10.0\n",
        )
        .unwrap();

        let adapter = CsvAdapter::new(base.clone());
        let bars = adapter.fetch_daily("QQQ", None, None).unwrap();
        let bars = validate_series(bars, "QQQ").unwrap();
        let run = run_simulation(bars, policy(), 3.0).unwrap();

        let output = base.join("QQQ_daily_with_dca.csv");
        CsvAdapter::write_augmented(&run, &output).unwrap();

        let content = fs::read_to_string(&output).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 4);

        // Feb 26: 10 base shares from January plus 1000/110 bought today.
        let feb: Vec<&str> = lines[3].split(',').collect();
        assert_eq!(feb[0], "2021-02-26");
        let cumulative_shares: f64 = feb[10].parse().unwrap();
        assert!((cumulative_shares - (10.0 + 1000.0 / 110.0)).abs() < 1e-9);
        let portfolio_value: f64 = feb[11].parse().unwrap();
        assert!((portfolio_value - cumulative_shares * 110.0).abs() < 1e-9);

        // Leveraged close moved 30%: 100 -> 130.
        let leveraged_close: f64 = feb[13].parse().unwrap();
        assert!((leveraged_close - 130.0).abs() < 1e-9);
    }

    #[test]
    fn identical_input_identical_totals() {
        let bars = generate_bars("2021-01-04", 120, 100.0, 0.1);

        let a = run_simulation(
            validate_series(bars.clone(), "QQQ").unwrap(),
            policy(),
            3.0,
        )
        .unwrap();
        let b = run_simulation(validate_series(bars, "QQQ").unwrap(), policy(), 3.0).unwrap();

        assert_eq!(a.base, b.base);
        assert_eq!(a.leveraged, b.leveraged);
        assert_eq!(a.leveraged_series, b.leveraged_series);
    }
}

mod monthly_schedule {
    use super::*;

    #[test]
    fn four_months_of_generated_bars() {
        // ~4 months of contiguous days starting Jan 4.
        let bars = generate_bars("2021-01-04", 115, 100.0, 0.0);
        let bars = validate_series(bars, "QQQ").unwrap();
        let run = run_simulation(bars, policy(), 3.0).unwrap();

        let investment_days: Vec<_> = run
            .bars
            .iter()
            .zip(&run.base)
            .filter(|(_, d)| d.contribution > 0.0)
            .map(|(b, _)| b.date)
            .collect();

        assert_eq!(
            investment_days,
            vec![
                date(2021, 1, 26),
                date(2021, 2, 26),
                date(2021, 3, 26),
                date(2021, 4, 26),
            ]
        );

        let last = run.base.last().unwrap();
        assert!((last.cumulative_invested - 4000.0).abs() < 1e-9);
    }

    #[test]
    fn truncated_final_month_falls_back_to_last_day() {
        // February data stops on the 20th: no day >= 26 exists.
        let bars = vec![
            make_bar("2021-01-26", 100.0, None),
            make_bar("2021-02-15", 100.0, Some(0.0)),
            make_bar("2021-02-20", 100.0, Some(0.0)),
        ];
        let run = run_simulation(validate_series(bars, "QQQ").unwrap(), policy(), 3.0).unwrap();

        assert!((run.base[2].contribution - 1000.0).abs() < 1e-9);
        assert!((run.base[1].contribution - 0.0).abs() < 1e-9);
        assert!((run.base[2].cumulative_invested - 2000.0).abs() < 1e-9);
    }

    #[test]
    fn value_dips_on_pre_investment_days() {
        // Shares bought in January repriced at February's lower closes.
        let bars = vec![
            make_bar("2021-01-26", 100.0, None),
            make_bar("2021-02-10", 80.0, Some(-20.0)),
            make_bar("2021-02-26", 80.0, Some(0.0)),
        ];
        let run = run_simulation(validate_series(bars, "QQQ").unwrap(), policy(), 3.0).unwrap();

        assert!((run.base[0].portfolio_value - 1000.0).abs() < 1e-9);
        assert!((run.base[1].portfolio_value - 800.0).abs() < 1e-9);
        assert!((run.base[1].cumulative_invested - 1000.0).abs() < 1e-9);
    }
}

mod leveraged_pipeline {
    use super::*;

    #[test]
    fn anchor_and_compounding() {
        let bars = generate_bars("2021-01-04", 40, 100.0, 1.0);
        let run = run_simulation(validate_series(bars, "QQQ").unwrap(), policy(), 3.0).unwrap();

        assert!((run.leveraged_series.closes[0] - 100.0).abs() < 1e-9);
        for i in 1..run.bars.len() {
            let ratio = run.leveraged_series.closes[i] / run.leveraged_series.closes[i - 1] - 1.0;
            assert!((ratio - 0.03).abs() < 1e-9);
        }
    }

    #[test]
    fn leveraged_outruns_base_in_a_rising_market() {
        let bars = generate_bars("2021-01-04", 200, 100.0, 0.5);
        let run = run_simulation(validate_series(bars, "QQQ").unwrap(), policy(), 3.0).unwrap();
        let summary = RunSummary::compute(&run);

        assert!(summary.leveraged.final_value > summary.base.final_value);
        assert!(summary.final_value_ratio > 1.0);
        // Both series invest the same capital.
        assert!(
            (summary.leveraged.total_invested - summary.base.total_invested).abs() < 1e-9
        );
    }

    #[test]
    fn missing_first_return_projects_flat_anchor() {
        let bars = vec![
            make_bar("2021-01-25", 100.0, None),
            make_bar("2021-01-26", 102.0, Some(2.0)),
        ];
        let run = run_simulation(validate_series(bars, "QQQ").unwrap(), policy(), 3.0).unwrap();

        assert_eq!(run.leveraged_series.returns_pct[0], None);
        assert!((run.leveraged_series.closes[0] - 100.0).abs() < 1e-9);
        assert!((run.leveraged_series.closes[1] - 106.0).abs() < 1e-9);
    }
}

mod ingestion_validation {
    use super::*;

    #[test]
    fn duplicate_dates_rejected_before_simulation() {
        let bars = vec![
            make_bar("2021-01-26", 100.0, None),
            make_bar("2021-01-26", 101.0, Some(1.0)),
        ];
        let err = validate_series(bars, "QQQ").unwrap_err();
        assert!(matches!(err, DcasimError::DuplicateDate { .. }));
    }

    #[test]
    fn degenerate_price_rejected_with_date_and_field() {
        let mut bad = make_bar("2021-01-26", 100.0, None);
        bad.close = -3.0;
        let err = validate_series(vec![bad], "QQQ").unwrap_err();
        match err {
            DcasimError::DegeneratePrice { date: d, field, value } => {
                assert_eq!(d, date(2021, 1, 26));
                assert_eq!(field, "close");
                assert!((value + 3.0).abs() < 1e-9);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn malformed_csv_row_names_row() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad_daily.csv");
        fs::write(
            &path,
            "date,open,high,low,close,volume,return_pct\n\
             2021-01-25,99.5,101.0,99.0,100.0,not_a_volume,\n",
        )
        .unwrap();

        let err = CsvAdapter::read_file(&path).unwrap_err();
        assert!(matches!(
            err,
            DcasimError::InvalidField { row: 1, field, .. } if field == "volume"
        ));
    }
}

mod integrity_check {
    use super::*;

    #[test]
    fn gaps_reported_but_tolerated_by_pipeline() {
        // A holiday week missing from an otherwise contiguous series.
        let mut bars = generate_bars("2021-01-04", 20, 100.0, 0.0);
        bars.retain(|b| b.date < date(2021, 1, 11) || b.date > date(2021, 1, 15));

        let report = check_series(&bars);
        assert_eq!(report.gaps.len(), 1);
        assert_eq!(report.gaps[0].missing_days, 5);
        assert!(report.is_clean());

        // The same gappy series still simulates.
        let run = run_simulation(validate_series(bars, "QQQ").unwrap(), policy(), 3.0);
        assert!(run.is_ok());
    }

    #[test]
    fn duplicates_flagged_as_dirty() {
        let bars = vec![
            make_bar("2021-01-26", 100.0, None),
            make_bar("2021-01-26", 100.0, None),
        ];
        let report = check_series(&bars);
        assert!(!report.is_clean());
        assert_eq!(report.duplicates, vec![date(2021, 1, 26)]);
    }
}
