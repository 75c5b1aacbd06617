//! Dashboard styles layered on top of Bootstrap

pub const STYLES: &str = r#"
        body { background: #f5f7fa; }
        .fade-in { animation: fadeIn 0.3s ease-in; }
        @keyframes fadeIn { from { opacity: 0; } to { opacity: 1; } }

        .stat-card .stat-value { font-size: 2rem; font-weight: 700; }
        .stat-card .stat-label { color: #6c757d; font-size: 0.85rem; text-transform: uppercase; }

        .trend-up { color: #198754; font-weight: 600; }
        .trend-down { color: #dc3545; font-weight: 600; }
        .trend-neutral { color: #6c757d; }

        .signal-badge { margin: 1px; font-weight: 500; }
        .signal-card { border-width: 2px; }
        .reco-card .card { transition: transform 0.15s; }
        .reco-card .card:hover { transform: translateY(-2px); }

        .signal-level-card { border-left: 6px solid #6c757d; }
        .signal-HIGH_PROBABILITY { border-left-color: #198754; }
        .signal-MEDIUM_PROBABILITY { border-left-color: #ffc107; }
        .signal-NEGATIVE_SIGNAL { border-left-color: #dc3545; }
        .main-signal-icon { font-size: 3rem; }

        .news-item { padding: 0.75rem; margin-bottom: 0.5rem; border-radius: 6px; background: #fff; border-left: 4px solid #dee2e6; }
        .news-item.positive { border-left-color: #198754; }
        .news-item.negative { border-left-color: #dc3545; }
        .keyword-badge { margin-right: 4px; font-weight: 400; }

        .timeline-item { position: relative; padding-left: 24px; margin-bottom: 12px; }
        .timeline-marker { position: absolute; left: 0; top: 10px; width: 12px; height: 12px; border-radius: 50%; background: #6c757d; }
        .timeline-marker.high { background: #198754; }
        .timeline-marker.medium { background: #ffc107; }
        .timeline-marker.negative { background: #dc3545; }
        .timeline-marker.low { background: #adb5bd; }

        .btn-close-form { display: inline; float: right; }
"#;
