use rand::Rng;
use rand::rngs::StdRng;
use rental_allocation::{DueAmount, Money, Obligation, ObligationKind};
use rust_decimal::Decimal;
use std::collections::HashSet;
use std::fs::File;
use std::io::Error;
use std::path::Path;

pub fn cents(value: i64) -> Money {
    Money::new(Decimal::new(value, 2))
}

/// Random obligations with amounts between 0.01 and 5000.00.
///
/// With `distinct` set no two obligations owe the same amount.
pub fn random_obligations(rng: &mut StdRng, max_len: usize, distinct: bool) -> Vec<Obligation> {
    let len = rng.gen_range(1..=max_len);
    let mut seen = HashSet::new();
    let mut obligations = Vec::with_capacity(len);
    while obligations.len() < len {
        let amount = rng.gen_range(1..=500_000i64);
        if distinct && !seen.insert(amount) {
            continue;
        }
        let i = obligations.len();
        let kind = if rng.gen_bool(0.3) {
            ObligationKind::Fee
        } else {
            ObligationKind::RentInstallment
        };
        obligations.push(Obligation::new(
            format!("ob-{i}"),
            kind,
            format!("Obligation {i}"),
            DueAmount::new(Decimal::new(amount, 2)).unwrap(),
        ));
    }
    obligations
}

pub fn total_due(obligations: &[Obligation]) -> Money {
    obligations.iter().map(|o| o.due_money()).sum()
}

pub fn generate_schedule_csv(path: &Path, contracts: usize, installments: u32) -> Result<(), Error> {
    let file = File::create(path)?;
    let mut wtr = csv::WriterBuilder::new().from_writer(file);

    wtr.write_record(["contract", "kind", "item", "due_date", "remaining"])?;

    for c in 1..=contracts {
        let contract = format!("C-{c}");
        for i in 1..=installments {
            let sequence = i.to_string();
            let due_date = format!("2026-{:02}-01", (i - 1) % 12 + 1);
            wtr.write_record([
                contract.as_str(),
                "installment",
                sequence.as_str(),
                due_date.as_str(),
                "1000.00",
            ])?;
        }
        wtr.write_record([contract.as_str(), "fee", "platform", "", "50"])?;
    }

    wtr.flush()?;
    Ok(())
}
