//! Unit tests for payload normalization, labels and form parsing.

#[cfg(test)]
mod normalize_tests {
    use crate::error::ValidationError;
    use crate::models::{
        Action, Confidence, NewsCategory, Position, PositionKind, PositionRecord, SignalKind,
        SignalLevel,
    };
    use crate::normalize::*;

    // ============= Position Aliasing =============

    #[test]
    fn test_position_prefers_qty() {
        let record = PositionRecord {
            symbol: "SBER".to_string(),
            qty: Some(10),
            quantity: Some(7),
            ..PositionRecord::default()
        };
        let position = position_from_record(record);
        assert_eq!(position.quantity, 10);
    }

    #[test]
    fn test_position_falls_back_to_quantity() {
        let record = PositionRecord {
            symbol: "GAZP".to_string(),
            quantity: Some(5),
            name: Some("legacy".to_string()),
            ..PositionRecord::default()
        };
        let position = position_from_record(record);

        assert_eq!(position.quantity, 5);
        assert_eq!(position.notes, "legacy");
        assert_eq!(position.market, "moex");
        assert_eq!(position.kind, PositionKind::Stock);
    }

    #[test]
    fn test_position_notes_win_over_name() {
        let record = PositionRecord {
            notes: Some("core".to_string()),
            name: Some("old".to_string()),
            ..PositionRecord::default()
        };
        assert_eq!(position_from_record(record).notes, "core");
    }

    #[test]
    fn test_position_missing_quantity_is_zero() {
        let position = position_from_record(PositionRecord::default());
        assert_eq!(position.quantity, 0);
        assert_eq!(position.notes, "");
    }

    #[test]
    fn test_position_record_writes_both_aliases() {
        let position = Position {
            symbol: "LKOH".to_string(),
            quantity: 3,
            notes: "energy".to_string(),
            ..Position::default()
        };
        let record = position_to_record(&position);

        assert_eq!(record.qty, Some(3));
        assert_eq!(record.quantity, Some(3));
        assert_eq!(record.notes.as_deref(), Some("energy"));
        assert_eq!(record.name.as_deref(), Some("energy"));
        assert_eq!(record.avg_price, Some(0.0));
    }

    // ============= Labels =============

    #[test]
    fn test_every_signal_has_label() {
        let known = [
            SignalKind::PriceAboveSma200,
            SignalKind::PriceBelowSma200,
            SignalKind::Sma50CrossUpSma200,
            SignalKind::Sma50CrossDownSma200,
            SignalKind::DyGtTarget,
            SignalKind::VolSpike,
            SignalKind::Near52wLow,
            SignalKind::Near52wHigh,
        ];
        for kind in &known {
            let label = signal_label(kind);
            assert!(!label.text.is_empty());
            assert_ne!(label.text, kind.as_str());
        }
        assert_eq!(signal_label(&SignalKind::PriceAboveSma200).tone, Tone::Success);
        assert_eq!(signal_label(&SignalKind::Sma50CrossDownSma200).tone, Tone::Danger);
    }

    #[test]
    fn test_unknown_signal_falls_back() {
        let kind = SignalKind::from("RSI_OVERSOLD");
        let label = signal_label(&kind);

        assert_eq!(label.text, "RSI_OVERSOLD");
        assert_eq!(label.tone, Tone::Secondary);
    }

    #[test]
    fn test_signal_title_expands_dividend_label() {
        assert_eq!(signal_title(&SignalKind::DyGtTarget).text, "💵 High dividend yield");
        assert_eq!(signal_title(&SignalKind::VolSpike), signal_label(&SignalKind::VolSpike));
    }

    #[test]
    fn test_signal_level_labels() {
        assert_eq!(signal_level_label(&SignalLevel::HighProbability).tone, Tone::Success);
        assert_eq!(signal_level_label(&SignalLevel::NegativeSignal).tone, Tone::Danger);
        assert_eq!(signal_level_icon(&SignalLevel::Low), "😐");
        assert_eq!(signal_level_icon(&SignalLevel::from("SOMETHING")), "🔮");
        assert_eq!(history_marker_class(&SignalLevel::MediumProbability), "medium");
        assert_eq!(history_marker_class(&SignalLevel::from("SOMETHING")), "low");
    }

    #[test]
    fn test_category_labels() {
        assert_eq!(category_class(&NewsCategory::HighProbability), "positive");
        assert_eq!(category_class(&NewsCategory::Negative), "negative");
        assert_eq!(category_class(&NewsCategory::Neutral), "");
        assert_eq!(category_label(&NewsCategory::from("RUMOR")).tone, Tone::Secondary);
    }

    #[test]
    fn test_action_labels_and_stars() {
        assert_eq!(action_label(&Action::Buy).tone, Tone::Success);
        assert_eq!(action_label(&Action::Sell).tone, Tone::Danger);
        assert_eq!(action_label(&Action::from("WAIT")).text, "WAIT");
        assert_eq!(confidence_stars(&Confidence::High), "⭐⭐⭐");
        assert_eq!(confidence_stars(&Confidence::Medium), "⭐⭐");
        assert_eq!(confidence_stars(&Confidence::from("UNSURE")), "⭐");
    }

    // ============= Keyword Polarity =============

    #[test]
    fn test_parse_keyword() {
        assert_eq!(
            parse_keyword("+dividends"),
            Keyword { polarity: Polarity::Positive, text: "dividends" }
        );
        assert_eq!(
            parse_keyword("-sanctions"),
            Keyword { polarity: Polarity::Negative, text: "sanctions" }
        );
        assert_eq!(
            parse_keyword("buyback"),
            Keyword { polarity: Polarity::Neutral, text: "buyback" }
        );
        assert_eq!(parse_keyword("").text, "");
    }

    // ============= Form Input =============

    #[test]
    fn test_validate_ticker() {
        assert_eq!(validate_ticker("  SBER1 "), Ok("SBER1".to_string()));
        assert_eq!(validate_ticker("   "), Err(ValidationError::EmptyTicker));
        assert_eq!(
            validate_ticker("sber1"),
            Err(ValidationError::InvalidTicker { symbol: "sber1".to_string() })
        );
        assert!(validate_ticker("SB-ER").is_err());
    }

    #[test]
    fn test_parse_ticker_list() {
        assert_eq!(
            parse_ticker_list(" sber, GAZP ,,lkoh ").unwrap(),
            vec!["SBER", "GAZP", "LKOH"]
        );
        assert_eq!(parse_ticker_list(" , ,"), Err(ValidationError::NoTickers));
    }

    #[test]
    fn test_parse_numbers() {
        assert_eq!(parse_number_or_zero("12.5"), 12.5);
        assert_eq!(parse_number_or_zero("abc"), 0.0);
        assert_eq!(parse_number_or_zero("NaN"), 0.0);
        assert_eq!(parse_count_or_zero("10"), 10);
        assert_eq!(parse_count_or_zero("10.0"), 10);
        assert_eq!(parse_count_or_zero("-3"), 0);
        assert_eq!(parse_count_or_zero(""), 0);
    }

    #[test]
    fn test_parse_sma_windows() {
        assert_eq!(parse_sma_windows("20, 50, 200"), vec![20, 50, 200]);
        assert_eq!(parse_sma_windows("20, x, 200,"), vec![20, 200]);
        assert!(parse_sma_windows("").is_empty());
    }
}
