/// rate change - fixed period ends and the loan reprices
use loan_amortization_rs::{simulate, Event, LoanParameters, Money, Rate};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    println!("=== rate change example ===\n");

    for recalculate in [false, true] {
        // 4.88% for ten years, 4.47% afterwards
        let params = LoanParameters::builder()
            .loan_amount(Money::from_major(100_000))
            .term_months(300)
            .rate(Rate::from_bps(488))
            .rate_change(120, Rate::from_bps(447))
            .recalculate_on_rate_change(recalculate)
            .build()?;

        let result = simulate(&params)?;

        println!("--- recalculate installment: {} ---", recalculate);
        println!("{}", result.summary());

        for event in &result.events {
            if let Event::InterestRateChanged { month, old_rate, new_rate } = event {
                println!("month {}: {:.2} -> {:.2}", month, old_rate, new_rate);
            }
        }
        println!();
    }

    Ok(())
}
