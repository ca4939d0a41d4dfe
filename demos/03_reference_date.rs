/// reference date - what is still owed from a point in time
use chrono::{TimeZone, Utc};
use loan_amortization_rs::{simulate, LoanParameters, Money, Rate, SafeTimeProvider, TimeSource, YearMonth};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== reference date example ===\n");

    // pin the clock so the output is reproducible
    let time = SafeTimeProvider::new(TimeSource::Test(
        Utc.with_ymd_and_hms(2025, 6, 15, 0, 0, 0).unwrap(),
    ));

    let params = LoanParameters::builder()
        .loan_amount(Money::from_major(380_000))
        .term_months(210)
        .rate(Rate::from_bps(488))
        .start_date(YearMonth::new(2021, 11)?)
        .reference_date_from(&time)
        .build()?;

    let result = simulate(&params)?;
    println!("{}\n", result.summary());

    if let Some(remaining) = result.remaining_after_reference {
        println!("after {}:", remaining.reference_date);
        println!("  payments left:   {}", remaining.payments);
        println!("  interest left:   {:.2}", remaining.interest);
        println!("  principal left:  {:.2}", remaining.principal);
    }

    Ok(())
}
