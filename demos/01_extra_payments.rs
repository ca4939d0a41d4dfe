/// extra payments - compare a schedule with and without overpayments
use loan_amortization_rs::{compare_with_extra_payments, LoanParameters, Money, Rate};
use rust_decimal_macros::dec;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    println!("=== extra payments example ===\n");

    // lump sums in months 1, 2 and 3, no prepayment penalty
    let params = LoanParameters::builder()
        .loan_amount(Money::from_major(380_000))
        .term_months(210)
        .rate(Rate::from_decimal(dec!(0.0488)))
        .monthly_fees(Money::from_str_exact("47.5")?)
        .extra_payments(vec![
            Money::from_major(420),
            Money::from_major(4_200),
            Money::from_major(42_000),
        ])
        .prepay_penalty_rate(Rate::ZERO)
        .build()?;

    let comparison = compare_with_extra_payments(&params)?;

    println!("--- without extra payments ---");
    println!("{}\n", comparison.baseline.summary());
    println!("--- with extra payments ---");
    println!("{}\n", comparison.with_extra.summary());

    println!("{}", comparison.summary());
    println!("months saved: {}", comparison.months_saved());
    println!("fees saved: {:.2}", comparison.fees_saved());

    // first few rows of the shortened schedule
    println!("\nmonth  principal   interest    balance");
    for entry in comparison.with_extra.entries.iter().take(6) {
        println!(
            "{:>5}  {:>10.2}  {:>9.2}  {:>10.2}",
            entry.month, entry.principal_paid, entry.interest_paid, entry.remaining_balance
        );
    }

    Ok(())
}
