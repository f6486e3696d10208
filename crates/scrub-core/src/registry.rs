//! Named, deterministic `string -> string` transforms (spec §4.B).
//!
//! `Anonymizer` is a flat sum type rather than a trait hierarchy: every
//! variant is pure, total, and dispatches through one `match` in `apply`.
//! Pool-backed variants draw from `scrub-fakedata` via the salted sampler so
//! the same input always produces the same output, in this process or any
//! other.

use std::sync::Arc;

use scrub_fakedata as pool;

use crate::column::StringFn;
use crate::sampler::{sample, salted_pool_index};

#[derive(Debug, Clone)]
pub enum Anonymizer {
    /// Always the empty string; distinct from nulling out a column (`.nulled()`),
    /// which removes the value entirely rather than replacing it with `""`.
    Null,
    Redact,
    PartialRedact { keep_start: usize, keep_end: usize },
    Fixed(String),
    LoremText,
    FirstName,
    MaleFirstName,
    FemaleFirstName,
    LastName,
    FullName,
    Email,
    PhoneNumber,
    StreetAddress,
    City,
    State,
    StateAbbr,
    ZipCode,
    Country,
}

impl Anonymizer {
    pub fn apply(&self, input: &str) -> String {
        match self {
            Anonymizer::Null => String::new(),
            Anonymizer::Redact => "*".repeat(input.chars().count()),
            Anonymizer::PartialRedact { keep_start, keep_end } => partial_redact(input, *keep_start, *keep_end),
            Anonymizer::Fixed(v) => v.clone(),
            Anonymizer::LoremText => lorem_text(input),
            Anonymizer::FirstName => sample("first_name", input, pool::FIRST_NAMES).to_string(),
            Anonymizer::MaleFirstName => sample("male_first_name", input, pool::MALE_FIRST_NAMES).to_string(),
            Anonymizer::FemaleFirstName => sample("female_first_name", input, pool::FEMALE_FIRST_NAMES).to_string(),
            Anonymizer::LastName => sample("last_name", input, pool::LAST_NAMES).to_string(),
            Anonymizer::FullName => full_name(input),
            Anonymizer::Email => email(input),
            Anonymizer::PhoneNumber => phone_number(input),
            Anonymizer::StreetAddress => street_address(input),
            Anonymizer::City => sample("city", input, pool::CITIES).to_string(),
            Anonymizer::State => sample("state", input, pool::STATES).to_string(),
            Anonymizer::StateAbbr => sample("state_abbr", input, pool::STATE_ABBREVIATIONS).to_string(),
            Anonymizer::ZipCode => sample("zip_code", input, pool::ZIP_CODES).to_string(),
            Anonymizer::Country => sample("country", input, pool::COUNTRIES).to_string(),
        }
    }

    /// Turns this named anonymizer into the function value the column DSL
    /// (`OutputColumn::Transformed`) carries.
    pub fn into_fn(self) -> StringFn {
        Arc::new(move |s: &str| self.apply(s))
    }
}

fn partial_redact(input: &str, keep_start: usize, keep_end: usize) -> String {
    let chars: Vec<char> = input.chars().collect();
    if chars.len() < keep_start + keep_end {
        return input.to_string();
    }
    let start: String = chars[..keep_start].iter().collect();
    let end: String = chars[chars.len() - keep_end..].iter().collect();
    let elided = chars.len() - keep_start - keep_end;
    format!("{start}{}{end}", "*".repeat(elided))
}

fn lorem_text(input: &str) -> String {
    let target = input.chars().count();
    let mut out = String::new();
    let mut i = 0usize;
    loop {
        let word = sample(&format!("lorem.{i}"), input, pool::LOREM_WORDS);
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(word);
        i += 1;

        let diff = out.chars().count() as i64 - target as i64;
        if diff.abs() <= 1 || i > 512 {
            break;
        }
    }
    out
}

fn full_name(input: &str) -> String {
    let first = sample("full_name.first", input, pool::FIRST_NAMES);
    let last = sample("full_name.last", input, pool::LAST_NAMES);
    format!("{first} {last}")
}

fn email(input: &str) -> String {
    let first = sample("email.first", input, pool::FIRST_NAMES).to_lowercase();
    let last = sample("email.last", input, pool::LAST_NAMES).to_lowercase();
    let domain = sample("email.domain", input, pool::EMAIL_DOMAINS);
    format!("{first}.{last}@{domain}")
}

fn phone_number(input: &str) -> String {
    let digit = |role: &str| salted_pool_index(role, input.as_bytes(), 10);
    let area = (1..=3).map(|i| digit(&format!("phone.area.{i}")).to_string()).collect::<String>();
    let exch = (1..=3).map(|i| digit(&format!("phone.exch.{i}")).to_string()).collect::<String>();
    let line = (1..=4).map(|i| digit(&format!("phone.line.{i}")).to_string()).collect::<String>();
    format!("({area}) {exch}-{line}")
}

fn street_address(input: &str) -> String {
    let number = 100 + salted_pool_index("street.number", input.as_bytes(), 9900);
    let name = sample("street.name", input, pool::LAST_NAMES);
    let suffix = sample("street.suffix", input, pool::STREET_SUFFIXES);
    format!("{number} {name} {suffix}")
}
