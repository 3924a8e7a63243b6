use jiff::civil::Date;
use wasm_bindgen::prelude::*;

fn js_error(e: impl std::fmt::Display) -> JsError {
    JsError::new(&e.to_string())
}

/// `YYYY-MM-DD`, or today in the browser's time zone when absent.
fn start_date(start: Option<String>) -> Result<Date, JsError> {
    match start {
        Some(s) => s.parse().map_err(js_error),
        None => Ok(jiff::Zoned::now().date()),
    }
}

fn date_strings(dates: impl Iterator<Item = Date>) -> Result<JsValue, JsError> {
    let strings: Vec<String> = dates.map(|d| d.to_string()).collect();
    serde_wasm_bindgen::to_value(&strings).map_err(js_error)
}

/// A validated recurrence rule, usable from JavaScript.
#[wasm_bindgen]
pub struct Rule {
    inner: recur::Rule,
}

#[wasm_bindgen]
impl Rule {
    /// Parse rule text such as `FREQ=WEEKLY;BYDAY=MO,FR`.
    #[wasm_bindgen]
    pub fn parse(input: &str) -> Result<Rule, JsError> {
        let inner = recur::Rule::parse(input).map_err(js_error)?;
        Ok(Rule { inner })
    }

    /// Build from form input:
    /// `{ frequency, interval?, weekdays?, monthDay? }`.
    #[wasm_bindgen(js_name = "fromFields")]
    pub fn from_fields(fields: JsValue) -> Result<Rule, JsError> {
        let fields: recur::RuleFields = serde_wasm_bindgen::from_value(fields).map_err(js_error)?;
        let inner = recur::validate_and_build_rule(&fields).map_err(js_error)?;
        Ok(Rule { inner })
    }

    /// Canonical rule text, for storage.
    #[wasm_bindgen(js_name = "toString")]
    pub fn display(&self) -> String {
        recur::serialize(&self.inner)
    }

    /// The structured form of the rule.
    #[wasm_bindgen(js_name = "toJSON")]
    pub fn to_json(&self) -> Result<JsValue, JsError> {
        serde_wasm_bindgen::to_value(&self.inner).map_err(js_error)
    }

    /// Short English summary.
    pub fn describe(&self) -> String {
        self.inner.describe()
    }

    /// The next few dates from `start` as ISO strings, as a form preview.
    pub fn preview(&self, start: Option<String>) -> Result<JsValue, JsError> {
        let start = start_date(start)?;
        date_strings(self.inner.preview(start).into_iter())
    }

    /// The first `n` dates from `start`.
    pub fn occurrences(&self, start: Option<String>, n: u32) -> Result<JsValue, JsError> {
        let start = start_date(start)?;
        date_strings(self.inner.occurrences(start).take(n as usize))
    }

    /// The first date strictly after `after`.
    #[wasm_bindgen(js_name = "nextAfter")]
    pub fn next_after(&self, start: Option<String>, after: &str) -> Result<Option<String>, JsError> {
        let start = start_date(start)?;
        let after: Date = after.parse().map_err(js_error)?;
        Ok(self.inner.next_after(start, after).map(|d| d.to_string()))
    }

    /// Whether rule text is well-formed.
    pub fn validate(input: &str) -> bool {
        recur::Rule::validate(input)
    }
}

/// Parse a stored rule from its JSON form, e.g. a saved task record.
#[wasm_bindgen(js_name = "ruleFromJson")]
pub fn rule_from_json(json: &str) -> Result<Rule, JsError> {
    let inner: recur::Rule = serde_json::from_str(json).map_err(js_error)?;
    Ok(Rule { inner })
}
