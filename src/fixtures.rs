//! Fixture data for the explicit degrade-to-fixture policy.
//!
//! Served only when a caller passes [`FallbackPolicy::FixtureOnError`] to a
//! domain service; the gateway itself never substitutes data on failure.
//!
//! [`FallbackPolicy::FixtureOnError`]: crate::types::FallbackPolicy::FixtureOnError

use crate::types::{
    HourlyPoint, LineStatus, Production, ProductionLine, ProductionStats, ProductionStatus,
};

pub fn production_lines() -> Vec<ProductionLine> {
    vec![
        ProductionLine {
            id: "1".to_string(),
            name: "P1-MQA5".to_string(),
            status: LineStatus::Producing,
            code: "4GWL190175221".to_string(),
        },
        ProductionLine {
            id: "2".to_string(),
            name: "P1-MQA4".to_string(),
            status: LineStatus::Waiting,
            code: "4GWL280084334".to_string(),
        },
        ProductionLine {
            id: "3".to_string(),
            name: "P1-MQA3".to_string(),
            status: LineStatus::Producing,
            code: "4GWL28009239Q".to_string(),
        },
        ProductionLine {
            id: "4".to_string(),
            name: "P1-MQA2".to_string(),
            status: LineStatus::Starting,
            code: "4GWL280074571".to_string(),
        },
    ]
}

pub fn productions() -> Vec<Production> {
    vec![
        Production {
            id: "1".to_string(),
            line_id: "1".to_string(),
            product_code: "P100.0001.CX24".to_string(),
            product_name: "GUARAVITA NATURAL 290ML".to_string(),
            technician: "Lwruck@guaravita.com.br".to_string(),
            start_date: "28/08/2025 - 05:48".to_string(),
            end_date: None,
            status: ProductionStatus::InProgress,
        },
        Production {
            id: "2".to_string(),
            line_id: "1".to_string(),
            product_code: "P100.0001.CX24".to_string(),
            product_name: "GUARAVITA NATURAL 290ML".to_string(),
            technician: "Lwruck@guaravita.com.br".to_string(),
            start_date: "27/08/2025 - 05:58".to_string(),
            end_date: Some("28/08/2025 - 05:20".to_string()),
            status: ProductionStatus::Finished,
        },
    ]
}

pub fn production_stats() -> ProductionStats {
    ProductionStats {
        operation_hours: "17.4".to_string(),
        productive_hours: "14:00".to_string(),
        avg_production: 292.0,
        total_produced: 4082.0,
        hourly_production: vec![
            HourlyPoint {
                hour: "00:00".to_string(),
                value: 118.0,
            },
            HourlyPoint {
                hour: "01:00".to_string(),
                value: 0.0,
            },
            HourlyPoint {
                hour: "02:00".to_string(),
                value: 0.0,
            },
            HourlyPoint {
                hour: "03:00".to_string(),
                value: 264.0,
            },
            HourlyPoint {
                hour: "04:00".to_string(),
                value: 301.0,
            },
        ],
    }
}
