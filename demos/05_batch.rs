/// batch - simulate many independent loans at once
use loan_amortization_rs::{simulate_many, LoanParameters, Money, Rate};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    println!("=== batch example ===\n");

    // same loan across a grid of rates and terms
    let mut loans = Vec::new();
    for rate_bps in [300, 400, 500, 600] {
        for years in [15, 20, 25, 30] {
            loans.push(LoanParameters::new(
                Money::from_major(200_000),
                years * 12,
                Rate::from_bps(rate_bps),
            ));
        }
    }

    let results = simulate_many(&loans);

    println!("  rate  years  installment  total interest");
    for (params, result) in loans.iter().zip(results) {
        let result = result?;
        println!(
            "{:>6}  {:>5}  {:>11.2}  {:>14.2}",
            format!("{:.2}", params.annual_interest_rate),
            params.term_months / 12,
            result.initial_payment,
            result.total_interest
        );
    }

    Ok(())
}
