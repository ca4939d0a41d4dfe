/// quick start - minimal example to get started
use loan_amortization_rs::{simulate, LoanParameters, Money, Rate};
use rust_decimal_macros::dec;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 100k over 25 years at 5.2%
    let params = LoanParameters::builder()
        .loan_amount(Money::from_major(100_000))
        .term_months(300)
        .rate(Rate::from_decimal(dec!(0.052)))
        .build()?;

    let result = simulate(&params)?;
    println!("{}", result.summary());

    Ok(())
}
