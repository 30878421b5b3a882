//! Fixed demo dataset served when no upstream credentials are configured.

use serde_json::{json, Value};

use crate::key::PerformanceQuery;

/// Monthly figures used for every demo district: (month, workers, wages, projects, work days).
const DEMO_MONTHS: [(&str, &str, &str, &str, &str); 3] = [
    ("October", "125000", "₹45,00,00,000", "850", "2,50,000"),
    ("September", "118000", "₹42,00,00,000", "820", "2,35,000"),
    ("August", "132000", "₹48,00,00,000", "880", "2,65,000"),
];

const DEMO_FINANCIAL_YEAR: &str = "2023-24";

/// Build the demo payload for a query, shaped like an upstream response
/// (`records`, `total`, `count`).
pub fn demo_payload(query: &PerformanceQuery) -> Value {
    let records: Vec<Value> = DEMO_MONTHS
        .iter()
        .map(|(month, workers, wages, projects, work_days)| {
            json!({
                "state_name": query.region(),
                "district_name": query.sub_region(),
                "total_workers": workers,
                "total_wages_paid": wages,
                "total_projects": projects,
                "total_work_days": work_days,
                "financial_year": DEMO_FINANCIAL_YEAR,
                "month": month,
            })
        })
        .collect();

    let count = records.len();
    json!({
        "records": records,
        "total": count,
        "count": count,
    })
}
