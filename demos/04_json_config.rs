/// json config - load parameters, export the schedule
use loan_amortization_rs::{plan, LoanParameters};

const CONFIG: &str = r#"{
    "loan_amount": "250000",
    "term_months": 240,
    "annual_interest_rate": "0.045",
    "monthly_fees": "12.5",
    "extra_payments": "300",
    "prepay_penalty_rate": "0.01",
    "overpayment_strategy": "ReduceEmi",
    "start_date": { "year": 2024, "month": 3 }
}"#;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== json config example ===\n");

    let params = LoanParameters::from_json(CONFIG)?;
    println!("parameters:\n{}\n", params.to_json_pretty()?);

    let plan = plan(&params)?;
    if let Some(comparison) = &plan.comparison {
        println!("{}\n", comparison.summary().to_json_pretty()?);
    }

    // cumulative curves, one point per year
    for point in plan.baseline.chart_points().iter().step_by(12) {
        println!(
            "month {:>3}: interest {:>10.2}  principal {:>10.2}",
            point.month, point.cumulative_interest, point.cumulative_principal
        );
    }

    Ok(())
}
