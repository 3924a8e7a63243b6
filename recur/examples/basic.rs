//! Basic recur API walkthrough: build, encode, parse, project.

use recur::{Frequency, Rule, RuleFields};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Build a rule from form input
    let rule = RuleFields::new(Frequency::Weekly)
        .interval(2)
        .weekdays([1, 3])
        .build()?;
    println!("Rule: {rule} ({})", rule.describe());

    // Project the next few dates
    let start: jiff::civil::Date = "2025-06-16".parse()?;
    println!("\nPreview from {start}:");
    for d in rule.preview(start) {
        println!("  {d}");
    }

    // Jump ahead without walking the whole sequence
    let after: jiff::civil::Date = "2030-01-01".parse()?;
    if let Some(next) = rule.next_after(start, after) {
        println!("\nFirst after {after}: {next}");
    }

    // Stored text parses back to the same rule
    let parsed: Rule = rule.to_string().parse()?;
    assert_eq!(parsed, rule);

    // Malformed text points at the problem
    if let Err(e) = Rule::parse("FREQ=WEEKLY;BYDAY=MO,XX") {
        println!("\n{}", e.display_rich());
    }

    Ok(())
}
