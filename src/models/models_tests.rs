//! Unit tests for backend payload decoding.

#[cfg(test)]
mod models_tests {
    use crate::models::*;
    use serde_json::json;

    // ============= Report =============

    fn sample_report() -> Report {
        serde_json::from_value(json!({
            "generated_at": "2025-01-15T10:30:00",
            "universe": ["SBER", "GAZP", "XXXX", "LKOH"],
            "by_symbol": {
                "SBER": {"price": 250.0, "sma_200": 200.0, "signals": ["PRICE_ABOVE_SMA200", "DY_GT_TARGET"]},
                "GAZP": {"price": 150.0, "signals": ["DY_GT_TARGET", "RSI_OVERSOLD"]},
                "XXXX": {"meta": {"error": "not found"}},
            }
        }))
        .unwrap()
    }

    #[test]
    fn test_report_decode() {
        let report = sample_report();

        assert_eq!(report.universe.len(), 4);
        let sber = report.snapshot("SBER").unwrap();
        assert_eq!(sber.price, Some(250.0));
        assert_eq!(sber.lot, None);
        assert!(sber.error().is_none());
        assert_eq!(report.snapshot("XXXX").unwrap().error(), Some("not found"));
    }

    #[test]
    fn test_unknown_signal_decodes() {
        let report = sample_report();
        let gazp = report.snapshot("GAZP").unwrap();

        assert_eq!(gazp.signals[1], SignalKind::Unknown("RSI_OVERSOLD".to_string()));
        assert!(!gazp.signals[1].is_known());
        assert_eq!(serde_json::to_value(&gazp.signals).unwrap(), json!(["DY_GT_TARGET", "RSI_OVERSOLD"]));
    }

    #[test]
    fn test_report_rows_follow_universe() {
        let report = sample_report();
        let rows: Vec<(&str, bool)> = report.rows().map(|(s, snap)| (s, snap.is_some())).collect();

        assert_eq!(rows, vec![("SBER", true), ("GAZP", true), ("XXXX", true), ("LKOH", false)]);
    }

    #[test]
    fn test_signal_groups_first_encounter_order() {
        let report = sample_report();
        let groups = report.signal_groups();
        let kinds: Vec<&str> = groups.iter().map(|(k, _)| k.as_str()).collect();

        assert_eq!(kinds, vec!["PRICE_ABOVE_SMA200", "DY_GT_TARGET", "RSI_OVERSOLD"]);
        let dividend: Vec<&str> = groups[1].1.iter().map(|(s, _)| *s).collect();
        assert_eq!(dividend, vec!["SBER", "GAZP"]);
    }

    #[test]
    fn test_signal_groups_empty() {
        assert!(Report::default().signal_groups().is_empty());
    }

    #[test]
    fn test_summary_defaults() {
        let summary: ReportSummary = serde_json::from_value(json!({
            "total_symbols": 3,
            "high_dividend_tickers": [{"symbol": "SBER", "dy_pct": 11.2}]
        }))
        .unwrap();

        assert_eq!(summary.total_symbols, 3);
        assert_eq!(summary.failed, 0);
        assert_eq!(summary.high_dividend_tickers[0].dy_pct, 11.2);
    }

    // ============= Recommendations =============

    fn reco(symbol: &str, action: &str) -> Recommendation {
        serde_json::from_value(json!({"symbol": symbol, "action": action, "score": 1.0})).unwrap()
    }

    #[test]
    fn test_recommendation_defaults() {
        let r = reco("SBER", "BUY");
        assert_eq!(r.action, Action::Buy);
        assert_eq!(r.confidence, Confidence::Medium);
        assert!(r.reasons.is_empty());
    }

    #[test]
    fn test_action_counts() {
        let list = vec![reco("A", "BUY"), reco("B", "SELL"), reco("C", "BUY"), reco("D", "WAIT")];
        assert_eq!(ActionCounts::tally(&list), ActionCounts { buy: 2, hold: 0, sell: 1 });
    }

    #[test]
    fn test_action_filter() {
        assert_eq!(ActionFilter::parse(""), ActionFilter::All);
        assert_eq!(ActionFilter::parse("ALL"), ActionFilter::All);
        assert_eq!(ActionFilter::parse("sell"), ActionFilter::Only(Action::Sell));

        let filter = ActionFilter::Only(Action::Sell);
        assert!(filter.matches(&Action::Sell));
        assert!(!filter.matches(&Action::Buy));
        assert!(ActionFilter::All.matches(&Action::from("WAIT")));
        assert_eq!(filter.as_str(), "SELL");
    }

    // ============= Forecast =============

    #[test]
    fn test_forecast_missing_stats_default_to_zero() {
        let forecast: ForecastResult = serde_json::from_value(json!({
            "signal_level": "HIGH_PROBABILITY",
            "reason": "Dividend news",
            "stats": {"total": 12, "HIGH_PROBABILITY": 2}
        }))
        .unwrap();

        assert_eq!(forecast.signal_level, SignalLevel::HighProbability);
        assert_eq!(forecast.stats.total, 12);
        assert_eq!(forecast.stats.high_probability, 2);
        assert_eq!(forecast.stats.negative, 0);
        assert_eq!(forecast.stats.avg_score, 0.0);
        assert!(forecast.top_items.is_empty());
    }

    #[test]
    fn test_news_item_unknown_category() {
        let item: NewsItem = serde_json::from_value(json!({
            "title": "t",
            "category": "SPECULATIVE",
            "matched_keywords": ["+buyback"]
        }))
        .unwrap();
        assert_eq!(item.category, NewsCategory::Unknown("SPECULATIVE".to_string()));
        assert!(item.description.is_none());
    }

    // ============= Portfolio =============

    #[test]
    fn test_position_serializes_both_aliases() {
        let position: Position = serde_json::from_value(json!({"symbol": "SBER", "quantity": 4, "name": "bank"})).unwrap();
        let value = serde_json::to_value(&position).unwrap();

        assert_eq!(value["qty"], json!(4));
        assert_eq!(value["quantity"], json!(4));
        assert_eq!(value["notes"], json!("bank"));
        assert_eq!(value["name"], json!("bank"));
        assert_eq!(value["type"], json!("stock"));
        assert_eq!(value["market"], json!("moex"));
        assert!(value.get("current_value").is_none());
    }

    #[test]
    fn test_position_kind_parse() {
        assert_eq!(PositionKind::parse("ETF"), PositionKind::Etf);
        assert_eq!(PositionKind::parse("crypto"), PositionKind::Stock);
    }

    #[test]
    fn test_portfolio_defaults() {
        let portfolio: Portfolio = serde_json::from_value(json!({})).unwrap();
        assert_eq!(portfolio.currency, "RUB");
        assert_eq!(portfolio, Portfolio::default());
    }

    #[test]
    fn test_portfolio_for_submission_drops_blank_symbols() {
        let portfolio = Portfolio {
            positions: vec![
                Position { symbol: " SBER ".to_string(), quantity: 1, ..Position::default() },
                Position { symbol: "  ".to_string(), quantity: 9, ..Position::default() },
            ],
            ..Portfolio::default()
        };
        let submission = portfolio.for_submission();

        assert_eq!(submission.positions.len(), 1);
        assert_eq!(submission.positions[0].symbol, "SBER");
        assert_eq!(portfolio.positions.len(), 2);
    }

    // ============= Settings =============

    #[test]
    fn test_config_update_skips_absent_sections() {
        let update = ConfigUpdate {
            dividend_target_pct: Some(8.0),
            ..ConfigUpdate::default()
        };
        assert_eq!(serde_json::to_value(&update).unwrap(), json!({"dividend_target_pct": 8.0}));
    }

    #[test]
    fn test_scheduler_status_next_job() {
        let status: SchedulerStatus = serde_json::from_value(json!({
            "running": true,
            "jobs": [{"id": "daily", "next_run_time": "2025-01-16T09:00:00+03:00"}]
        }))
        .unwrap();
        assert_eq!(
            status.next_job().and_then(|j| j.next_run_time.as_deref()),
            Some("2025-01-16T09:00:00+03:00")
        );
        assert!(SchedulerStatus::default().next_job().is_none());
    }
}
