//! Plain-text rendering for records and statistics.

use chrono::Local;
use tally_core::{
  record::Record,
  stats::{Statistics, Totals},
};

// ─── Formatting ───────────────────────────────────────────────────────────────

/// Amount with `,` thousands separators; the fractional part is kept only
/// when non-zero (`15000000` → `15,000,000`, `12.5` → `12.5`).
pub fn format_amount(amount: f64) -> String {
  let text = amount.abs().to_string();
  let (int, frac) = match text.split_once('.') {
    Some((i, f)) => (i, Some(f)),
    None => (text.as_str(), None),
  };

  let mut grouped = String::with_capacity(int.len() + int.len() / 3 + 2);
  if amount < 0.0 {
    grouped.push('-');
  }
  for (i, ch) in int.chars().enumerate() {
    if i > 0 && (int.len() - i) % 3 == 0 {
      grouped.push(',');
    }
    grouped.push(ch);
  }
  if let Some(frac) = frac {
    grouped.push('.');
    grouped.push_str(frac);
  }
  grouped
}

/// Balance effect of `record`: `+` for income, `-` for expense.
fn signed(record: &Record) -> String {
  let amount = record.signed_amount();
  if amount > 0.0 {
    format!("+{}", format_amount(amount))
  } else {
    format_amount(amount)
  }
}

/// One listing line: id, local creation time, signed amount, title.
pub fn record_line(record: &Record) -> String {
  format!(
    "#{:<5} {}  {:>15}  {}",
    record.id,
    record.created_at.with_timezone(&Local).format("%Y-%m-%d %H:%M"),
    signed(record),
    record.title,
  )
}

fn totals_line(label: &str, totals: &Totals) -> String {
  format!(
    "{label:<10} income {:>16}  expense {:>16}  balance {:>16}",
    format_amount(totals.income),
    format_amount(totals.expense),
    format_amount(totals.balance()),
  )
}

// ─── Output ───────────────────────────────────────────────────────────────────

pub fn print_records(records: &[Record]) {
  if records.is_empty() {
    println!("no records");
    return;
  }
  for record in records {
    println!("{}", record_line(record));
  }
}

pub fn print_record(record: &Record) {
  println!("id:       {}", record.id);
  println!("title:    {}", record.title);
  println!("amount:   {}", format_amount(record.amount));
  println!("kind:     {}", record.kind);
  println!(
    "created:  {}",
    record.created_at.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S")
  );
  if record.deleted {
    println!("status:   in trash");
  }
}

pub fn print_statistics(stats: &Statistics) {
  match stats {
    Statistics::Empty => println!("no records yet"),
    Statistics::Summary(summary) => {
      for month in &summary.months {
        println!("{}", totals_line(&month.month.to_string(), &month.totals));
      }
      println!();
      println!("{}", totals_line("total", &summary.totals));
    }
  }
}
