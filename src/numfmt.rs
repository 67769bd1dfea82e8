//! Number format interpretation
//!
//! Excel number format codes are a mini-language. A code has up to four
//! sections separated by semicolons:
//! - `positive;negative;zero;text`
//! - `positive;negative` (zero uses positive)
//! - `positive` (all numbers use this, negatives get a leading minus)
//!
//! Inside a section:
//! - `0` forces a digit, `#` shows significant digits only, `?` pads with a space
//! - `.` splits integer and fraction digits, `,` groups thousands (or scales
//!   by 1000 when it trails the last digit placeholder)
//! - `%` multiplies by 100, `E+`/`E-` switch to scientific notation,
//!   `/` switches to fractions, `@` stands for the cell text
//! - `\x` and `"..."` are literals, `_x` reserves a blank, `*x` emits `x` once
//! - `[...]` blocks (colors, conditions, locales) are skipped
//!
//! Nothing here fails: unusable codes fall back to the raw value.

use chrono::{Datelike, Days, NaiveDate};

use crate::error::{Result, XlhtmlError};
use crate::types::{CellValue, NumFmt};

/// Built-in number format IDs (0-49 are predefined by Excel)
/// See: ECMA-376 Part 1, Section 18.8.30
pub const fn builtin_format_code(id: u32) -> Option<&'static str> {
    match id {
        0 => Some("General"),
        1 => Some("0"),
        2 => Some("0.00"),
        3 => Some("#,##0"),
        4 => Some("#,##0.00"),
        5 => Some("$#,##0_);($#,##0)"),
        6 => Some("$#,##0_);[Red]($#,##0)"),
        7 => Some("$#,##0.00_);($#,##0.00)"),
        8 => Some("$#,##0.00_);[Red]($#,##0.00)"),
        9 => Some("0%"),
        10 => Some("0.00%"),
        11 => Some("0.00E+00"),
        12 => Some("# ?/?"),
        13 => Some("# ??/??"),
        14 => Some("mm-dd-yy"),
        15 => Some("d-mmm-yy"),
        16 => Some("d-mmm"),
        17 => Some("mmm-yy"),
        18 => Some("h:mm AM/PM"),
        19 => Some("h:mm:ss AM/PM"),
        20 => Some("h:mm"),
        21 => Some("h:mm:ss"),
        22 => Some("m/d/yy h:mm"),
        37 => Some("#,##0 ;(#,##0)"),
        38 => Some("#,##0 ;[Red](#,##0)"),
        39 => Some("#,##0.00;(#,##0.00)"),
        40 => Some("#,##0.00;[Red](#,##0.00)"),
        41 => Some("_(* #,##0_);_(* (#,##0);_(* \"-\"_);_(@_)"),
        42 => Some("_($* #,##0_);_($* (#,##0);_($* \"-\"_);_(@_)"),
        43 => Some("_(* #,##0.00_);_(* (#,##0.00);_(* \"-\"??_);_(@_)"),
        44 => Some("_($* #,##0.00_);_($* (#,##0.00);_($* \"-\"??_);_(@_)"),
        45 => Some("mm:ss"),
        46 => Some("[h]:mm:ss"),
        47 => Some("mmss.0"),
        48 => Some("##0.0E+0"),
        49 => Some("@"),
        _ => None,
    }
}

/// Look up a format code by id: workbook-defined formats shadow built-ins.
pub fn resolve_format_code(id: u32, custom: &[NumFmt]) -> Option<&str> {
    custom
        .iter()
        .find(|f| f.id == id)
        .map(|f| f.code.as_str())
        .or_else(|| builtin_format_code(id))
}

/// One section of a format code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatSection {
    pub code: String,
    /// The section formats day-count serials as dates/times.
    pub is_date: bool,
    /// The section carries its own sign (`-` or parentheses).
    has_sign: bool,
    /// The section has an `@` text slot.
    has_text_slot: bool,
}

impl FormatSection {
    fn new(code: &str) -> Self {
        let tokens = tokenize(code).unwrap_or_default();
        let is_date = is_date_format(code);
        Self {
            code: code.to_string(),
            is_date,
            has_sign: !is_date
                && tokens
                    .iter()
                    .any(|t| matches!(t, NumToken::Literal('-' | '('))),
            has_text_slot: tokens.contains(&NumToken::At),
        }
    }
}

/// A parsed format code: positive, negative, zero and text sections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumberFormatSpec {
    pub positive: FormatSection,
    pub negative: Option<FormatSection>,
    pub zero: Option<FormatSection>,
    pub text: Option<FormatSection>,
}

impl Default for NumberFormatSpec {
    fn default() -> Self {
        Self::general()
    }
}

impl NumberFormatSpec {
    pub fn general() -> Self {
        Self::parse("General")
    }

    pub fn parse(code: &str) -> Self {
        if code.trim().is_empty() {
            return Self::parse("General");
        }
        let mut sections = split_sections(code).into_iter().map(FormatSection::new);
        let positive = sections
            .next()
            .unwrap_or_else(|| FormatSection::new("General"));
        Self {
            positive,
            negative: sections.next(),
            zero: sections.next(),
            text: sections.next(),
        }
    }

    pub fn section_count(&self) -> usize {
        1 + usize::from(self.negative.is_some())
            + usize::from(self.zero.is_some())
            + usize::from(self.text.is_some())
    }

    /// Format a raw value. Text that parses as a number takes the numeric path.
    pub fn format(&self, value: &CellValue, date1904: bool) -> String {
        let raw = value.raw_text();
        match value.as_number() {
            Some(n) => self.format_number(n, &raw, date1904),
            None => self.format_text(&raw),
        }
    }

    /// Format a number. `raw` is returned unchanged when the code is unusable.
    pub fn format_number(&self, value: f64, raw: &str, date1904: bool) -> String {
        if !value.is_finite() {
            return raw.to_string();
        }
        let (section, needs_minus) = self.pick(value);
        if section.code.is_empty() {
            return String::new();
        }

        if section.is_date {
            return match tokenize_date(&section.code) {
                Ok(tokens) => render_date(value, &tokens, date1904).unwrap_or_else(|| {
                    log::debug!("serial {value} is not a valid date, using General");
                    format_general(value)
                }),
                Err(err) => {
                    log::debug!("{err}");
                    raw.to_string()
                }
            };
        }

        let tokens = match tokenize(&section.code) {
            Ok(tokens) => tokens,
            Err(err) => {
                log::debug!("{err}");
                return raw.to_string();
            }
        };
        let text = render_number(&tokens, value.abs());
        if value < 0.0 && needs_minus {
            format!("-{text}")
        } else {
            text
        }
    }

    /// Format text through the text section. Without an `@` slot the text passes through.
    pub fn format_text(&self, text: &str) -> String {
        let section = self
            .text
            .as_ref()
            .or_else(|| Some(&self.positive).filter(|s| s.has_text_slot));
        let Some(section) = section.filter(|s| s.has_text_slot) else {
            return text.to_string();
        };
        match tokenize(&section.code) {
            Ok(tokens) => tokens
                .iter()
                .fold(String::new(), |mut out, token| {
                    match token {
                        NumToken::At | NumToken::General => out.push_str(text),
                        NumToken::Digit(p) => out.push(p.symbol()),
                        other => out.extend(other.literal_char()),
                    }
                    out
                }),
            Err(err) => {
                log::debug!("{err}");
                text.to_string()
            }
        }
    }

    /// Choose the section for a number, and whether a minus has to be prepended.
    fn pick(&self, value: f64) -> (&FormatSection, bool) {
        if value < 0.0 {
            match &self.negative {
                Some(neg) => (neg, !neg.has_sign),
                None => (&self.positive, true),
            }
        } else if value == 0.0 {
            (self.zero.as_ref().unwrap_or(&self.positive), false)
        } else {
            (&self.positive, false)
        }
    }
}

/// Format a raw cell value with a parsed spec.
pub fn format_value(value: &CellValue, spec: &NumberFormatSpec, date1904: bool) -> String {
    spec.format(value, date1904)
}

/// Format a numeric value using a format code
pub fn format_number(value: f64, format_code: &str, date1904: bool) -> String {
    NumberFormatSpec::parse(format_code).format_number(value, &value.to_string(), date1904)
}

/// Format a text value using a format code
pub fn format_text(text: &str, format_code: &str) -> String {
    NumberFormatSpec::parse(format_code).format_text(text)
}

/// Split a code on `;` outside quotes, escapes and brackets.
fn split_sections(code: &str) -> Vec<&str> {
    let mut sections = Vec::new();
    let mut start = 0;
    let mut in_quotes = false;
    let mut in_brackets = false;
    let mut escaped = false;

    for (i, c) in code.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' if !in_quotes => escaped = true,
            '"' if !in_brackets => in_quotes = !in_quotes,
            '[' if !in_quotes => in_brackets = true,
            ']' if !in_quotes => in_brackets = false,
            ';' if !in_quotes && !in_brackets => {
                sections.push(code.get(start..i).unwrap_or_default());
                start = i + 1;
            }
            _ => {}
        }
    }
    sections.push(code.get(start..).unwrap_or_default());
    sections
}

/// Check if a format code is a date/time format
pub fn is_date_format(format_code: &str) -> bool {
    let mut chars = format_code.chars();
    while let Some(c) = chars.next() {
        match c.to_ascii_lowercase() {
            '"' => {
                for q in chars.by_ref() {
                    if q == '"' {
                        break;
                    }
                }
            }
            '\\' | '_' | '*' => {
                chars.next();
            }
            '[' => {
                let inner: String = chars.by_ref().take_while(|&q| q != ']').collect();
                if is_elapsed_block(&inner) {
                    return true;
                }
            }
            'y' | 'm' | 'd' | 'h' | 's' => return true,
            _ => {}
        }
    }
    false
}

fn is_elapsed_block(inner: &str) -> bool {
    let mut chars = inner.chars().map(|c| c.to_ascii_lowercase());
    match chars.next() {
        Some(first @ ('h' | 'm' | 's')) => chars.all(|c| c == first),
        _ => false,
    }
}

/// General format - smart number display
pub fn format_general(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let abs = value.abs();
    if abs == 0.0 {
        return "0".to_string();
    }
    if !(1e-4..1e11).contains(&abs) {
        let sci = format!("{value:.5e}");
        let (mantissa, exponent) = sci.split_once('e').unwrap_or((sci.as_str(), "0"));
        let mantissa = mantissa.trim_end_matches('0').trim_end_matches('.');
        let exponent: i32 = exponent.parse().unwrap_or(0);
        let sign = if exponent < 0 { '-' } else { '+' };
        return format!("{mantissa}E{sign}{:02}", exponent.unsigned_abs());
    }
    if value.fract() == 0.0 {
        return format!("{value:.0}");
    }
    let fixed = format!("{value:.10}");
    fixed.trim_end_matches('0').trim_end_matches('.').to_string()
}

// ---------------------------------------------------------------------------
// Numeric sections
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Placeholder {
    Zero,
    Hash,
    Question,
}

impl Placeholder {
    const fn symbol(self) -> char {
        match self {
            Self::Zero => '0',
            Self::Hash => '#',
            Self::Question => '?',
        }
    }

    /// What an unused placeholder prints.
    const fn pad(self) -> Option<char> {
        match self {
            Self::Zero => Some('0'),
            Self::Question => Some(' '),
            Self::Hash => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NumToken {
    Literal(char),
    Digit(Placeholder),
    Point,
    Comma,
    Percent,
    Exp { plus: bool },
    Slash,
    At,
    General,
}

impl NumToken {
    const fn is_digit(self) -> bool {
        matches!(self, Self::Digit(_))
    }

    /// Character emitted for a non-placeholder token.
    const fn literal_char(self) -> Option<char> {
        match self {
            Self::Literal(c) => Some(c),
            Self::Point => Some('.'),
            Self::Comma => Some(','),
            Self::Percent => Some('%'),
            Self::Slash => Some('/'),
            Self::Digit(_) | Self::Exp { .. } | Self::At | Self::General => None,
        }
    }
}

fn tokenize(code: &str) -> Result<Vec<NumToken>> {
    let malformed = |why: &str| XlhtmlError::Format(format!("{why} in {code:?}"));
    let mut tokens = Vec::new();
    let mut chars = code.chars().peekable();
    let mut seen_point = false;

    while let Some(c) = chars.next() {
        let token = match c {
            '"' => {
                let mut closed = false;
                for q in chars.by_ref() {
                    if q == '"' {
                        closed = true;
                        break;
                    }
                    tokens.push(NumToken::Literal(q));
                }
                if !closed {
                    return Err(malformed("unterminated quote"));
                }
                continue;
            }
            '\\' => NumToken::Literal(chars.next().ok_or_else(|| malformed("dangling escape"))?),
            '[' => {
                if !chars.by_ref().any(|q| q == ']') {
                    return Err(malformed("unterminated bracket"));
                }
                continue;
            }
            '_' => match chars.next() {
                Some(_) => NumToken::Literal(' '),
                None => continue,
            },
            '*' => match chars.next() {
                Some(fill) => NumToken::Literal(fill),
                None => continue,
            },
            '0' => NumToken::Digit(Placeholder::Zero),
            '#' => NumToken::Digit(Placeholder::Hash),
            '?' => NumToken::Digit(Placeholder::Question),
            '.' if !seen_point => {
                seen_point = true;
                NumToken::Point
            }
            ',' => NumToken::Comma,
            '%' => NumToken::Percent,
            '/' => NumToken::Slash,
            '@' => NumToken::At,
            'E' | 'e' if matches!(chars.peek(), Some('+' | '-')) => NumToken::Exp {
                plus: chars.next() == Some('+'),
            },
            'G' | 'g' => {
                let rest: String = chars.clone().take(6).collect();
                if rest.eq_ignore_ascii_case("eneral") {
                    chars.nth(5);
                    NumToken::General
                } else {
                    NumToken::Literal(c)
                }
            }
            _ => NumToken::Literal(c),
        };
        tokens.push(token);
    }
    Ok(tokens)
}

fn render_number(tokens: &[NumToken], magnitude: f64) -> String {
    if !tokens.iter().any(|t| t.is_digit()) {
        // Only literals plus General/@ slots.
        return tokens.iter().fold(String::new(), |mut out, token| {
            match token {
                NumToken::General | NumToken::At => out.push_str(&format_general(magnitude)),
                other => out.extend(other.literal_char()),
            }
            out
        });
    }
    if let Some(exp_at) = tokens.iter().position(|t| matches!(t, NumToken::Exp { .. })) {
        return render_scientific(tokens, exp_at, magnitude);
    }
    if tokens.contains(&NumToken::Slash) {
        if let Some(text) = render_fraction(tokens, magnitude) {
            return text;
        }
    }
    render_plain(tokens, magnitude)
}

/// Integer/fraction placeholder layout of a plain numeric section.
struct PlainLayout {
    int: Vec<NumToken>,
    frac: Option<Vec<NumToken>>,
    grouping: bool,
    thousands_scale: i32,
    percent: i32,
}

impl PlainLayout {
    fn new(tokens: &[NumToken]) -> Self {
        let mut kept = Vec::with_capacity(tokens.len());
        let mut grouping = false;
        let mut thousands_scale = 0;
        let mut percent = 0;

        for (i, &token) in tokens.iter().enumerate() {
            match token {
                NumToken::Comma => {
                    let digit_before = tokens
                        .get(..i)
                        .is_some_and(|before| before.iter().any(|t| t.is_digit()));
                    let next = tokens
                        .get(i + 1..)
                        .and_then(|after| after.iter().find(|t| **t != NumToken::Comma));
                    let digit_after = next.is_some_and(|t| t.is_digit());
                    if !digit_before {
                        kept.push(NumToken::Literal(','));
                    } else if digit_after {
                        grouping = true;
                    } else {
                        thousands_scale += 1;
                    }
                }
                NumToken::Percent => {
                    percent += 1;
                    kept.push(token);
                }
                _ => kept.push(token),
            }
        }

        let (int, frac) = match kept.iter().position(|t| *t == NumToken::Point) {
            Some(p) => {
                let frac = kept.split_off(p);
                (kept, Some(frac.into_iter().skip(1).collect()))
            }
            None => (kept, None),
        };

        Self {
            int,
            frac,
            grouping,
            thousands_scale,
            percent,
        }
    }

    fn decimals(&self) -> usize {
        self.frac
            .as_ref()
            .map_or(0, |f| f.iter().filter(|t| t.is_digit()).count())
    }

    fn render(&self, out: &mut String, int_digits: &str, frac_digits: &str) {
        fill_integer(out, &self.int, int_digits, self.grouping);
        if let Some(frac) = &self.frac {
            out.push('.');
            fill_fraction(out, frac, frac_digits);
        }
    }
}

fn render_plain(tokens: &[NumToken], magnitude: f64) -> String {
    let layout = PlainLayout::new(tokens);
    let value = magnitude * 100f64.powi(layout.percent) / 1000f64.powi(layout.thousands_scale);
    let (int_digits, frac_digits) = round_digits(value, layout.decimals());
    let mut out = String::new();
    layout.render(&mut out, &int_digits, &frac_digits);
    out
}

#[allow(clippy::cast_possible_truncation)]
fn render_scientific(tokens: &[NumToken], exp_at: usize, magnitude: f64) -> String {
    let (mantissa_tokens, rest) = tokens.split_at(exp_at);
    let Some((&NumToken::Exp { plus }, exponent_tokens)) = rest.split_first() else {
        return render_plain(tokens, magnitude);
    };

    let layout = PlainLayout::new(mantissa_tokens);
    let decimals = layout.decimals();

    let (mut mantissa, mut exponent) = if magnitude > 0.0 {
        let exponent = magnitude.log10().floor() as i32;
        (magnitude / 10f64.powi(exponent), exponent)
    } else {
        (0.0, 0)
    };
    // log10 is not exact near powers of ten
    if mantissa >= 10.0 {
        mantissa /= 10.0;
        exponent += 1;
    } else if mantissa > 0.0 && mantissa < 1.0 {
        mantissa *= 10.0;
        exponent -= 1;
    }

    let (mut int_digits, mut frac_digits) = round_digits(mantissa, decimals);
    if int_digits.len() > 1 {
        // 9.99 -> 10.0: renormalize to one leading digit
        exponent += 1;
        (int_digits, frac_digits) = round_digits(mantissa / 10.0, decimals);
    }

    let mut out = String::new();
    layout.render(&mut out, &int_digits, &frac_digits);
    out.push('E');
    if exponent < 0 {
        out.push('-');
    } else if plus {
        out.push('+');
    }
    let has_exp_placeholders = exponent_tokens.iter().any(|t| t.is_digit());
    let exp_digits = if exponent == 0 && has_exp_placeholders {
        String::new()
    } else {
        exponent.unsigned_abs().to_string()
    };
    fill_integer(&mut out, exponent_tokens, &exp_digits, false);
    out
}

/// 2^53: past this every f64 is an integer.
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn render_fraction(tokens: &[NumToken], magnitude: f64) -> Option<String> {
    let slash = tokens.iter().position(|t| *t == NumToken::Slash)?;
    let before = tokens.get(..slash)?;
    let after = tokens.get(slash + 1..)?;

    // Numerator: the placeholder run right before the slash.
    let num_start = before
        .iter()
        .rposition(|t| !t.is_digit())
        .map_or(0, |i| i + 1);
    let (whole_tokens, num_tokens) = before.split_at(num_start);
    if num_tokens.is_empty() {
        return None;
    }
    let has_whole = whole_tokens.iter().any(|t| t.is_digit());

    // Denominator: placeholders, or literal digits for a fixed denominator.
    let den_len = after
        .iter()
        .take_while(|t| matches!(t, NumToken::Digit(_) | NumToken::Literal('0'..='9')))
        .count();
    let (den_tokens, trailing) = after.split_at(den_len);
    let fixed_den = match den_tokens.first() {
        Some(NumToken::Literal('1'..='9')) => den_tokens
            .iter()
            .map(|t| match t {
                NumToken::Digit(p) => p.symbol(),
                other => other.literal_char().unwrap_or('0'),
            })
            .collect::<String>()
            .parse::<u64>()
            .ok()
            .filter(|d| *d > 0),
        _ => None,
    };
    let den_places = den_tokens.iter().filter(|t| t.is_digit()).count();
    if fixed_den.is_none() && den_places == 0 {
        return None;
    }

    if magnitude >= MAX_EXACT_INTEGER {
        return Some(format_general(magnitude));
    }
    let int_part = magnitude.trunc();
    let frac = magnitude - int_part;
    let (mut num, den) = match fixed_den {
        Some(d) => ((frac * d as f64).round() as u64, d),
        None => {
            let places = u32::try_from(den_places.clamp(1, 6)).unwrap_or(1);
            approximate_fraction(frac, 10u64.pow(places) - 1)
        }
    };
    let mut whole = int_part as u64;
    if num >= den {
        whole = whole.checked_add(num / den)?;
        num %= den;
    }
    if !has_whole {
        num = whole.checked_mul(den).and_then(|n| n.checked_add(num))?;
        whole = 0;
    }

    let mut out = String::new();
    if num == 0 {
        fill_integer(&mut out, whole_tokens, &digits_or_empty(whole), false);
        let trimmed = out.trim();
        return Some(if trimmed.is_empty() {
            "0".to_string()
        } else {
            out.trim_end().to_string()
        });
    }

    fill_integer(&mut out, whole_tokens, &digits_or_empty(whole), false);
    fill_integer(&mut out, num_tokens, &num.to_string(), false);
    out.push('/');
    if fixed_den.is_some() {
        out.extend(den_tokens.iter().map(|t| match t {
            NumToken::Digit(p) => p.symbol(),
            other => other.literal_char().unwrap_or('0'),
        }));
    } else {
        let den_text = den.to_string();
        let used = den_text.len();
        out.push_str(&den_text);
        for token in den_tokens.iter().skip(used) {
            if let NumToken::Digit(p) = token {
                out.extend(p.pad());
            }
        }
    }
    for token in trailing {
        out.extend(token.literal_char());
    }
    Some(out)
}

fn digits_or_empty(n: u64) -> String {
    if n == 0 {
        String::new()
    } else {
        n.to_string()
    }
}

/// Best fraction for `x` in [0, 1) with denominator at most `max_den`.
///
/// Walks the Stern-Brocot tree, stopping once the mediant is within 0.1% of `x`.
fn approximate_fraction(x: f64, max_den: u64) -> (u64, u64) {
    if x <= 0.0 {
        return (0, 1);
    }
    if x >= 1.0 {
        return (1, 1);
    }

    let tolerance = x * 0.001;
    let (mut lo_n, mut lo_d) = (0u64, 1u64);
    let (mut hi_n, mut hi_d) = (1u64, 1u64);

    loop {
        let (mid_n, mid_d) = (lo_n + hi_n, lo_d + hi_d);
        if mid_d > max_den {
            break;
        }
        let mid = mid_n as f64 / mid_d as f64;
        if (mid - x).abs() < tolerance {
            return (mid_n, mid_d);
        }
        if mid < x {
            (lo_n, lo_d) = (mid_n, mid_d);
        } else {
            (hi_n, hi_d) = (mid_n, mid_d);
        }
    }

    let lo_err = (lo_n as f64 / lo_d as f64 - x).abs();
    let hi_err = (hi_n as f64 / hi_d as f64 - x).abs();
    if lo_err < hi_err || (lo_err <= hi_err && lo_d <= hi_d) {
        (lo_n, lo_d)
    } else {
        (hi_n, hi_d)
    }
}

/// Write integer digits into placeholders, matching from the right.
///
/// Unused placeholders pad; digits left over at the leftmost placeholder are
/// all written there. Grouping commas only go between value digits.
fn fill_integer(out: &mut String, tokens: &[NumToken], digits: &str, grouping: bool) {
    let placeholders = tokens.iter().filter(|t| t.is_digit()).count();
    let mut pending = digits.chars().rev();
    let mut rev: Vec<char> = Vec::with_capacity(tokens.len() + digits.len());
    let mut written = 0usize;
    let mut put = |rev: &mut Vec<char>, d: char| {
        if grouping && written > 0 && written % 3 == 0 {
            rev.push(',');
        }
        rev.push(d);
        written += 1;
    };

    if placeholders == 0 {
        for d in pending.by_ref() {
            put(&mut rev, d);
        }
    }

    let mut seen = 0;
    for token in tokens.iter().rev() {
        match token {
            NumToken::Digit(p) => {
                seen += 1;
                if seen == placeholders {
                    let mut any = false;
                    for d in pending.by_ref() {
                        put(&mut rev, d);
                        any = true;
                    }
                    if !any {
                        rev.extend(p.pad());
                    }
                } else if let Some(d) = pending.next() {
                    put(&mut rev, d);
                } else {
                    rev.extend(p.pad());
                }
            }
            other => rev.extend(other.literal_char()),
        }
    }
    out.extend(rev.iter().rev());
}

/// Write fraction digits into placeholders, matching from the left.
fn fill_fraction(out: &mut String, tokens: &[NumToken], digits: &str) {
    let significant = digits.trim_end_matches('0').len();
    let mut value_digits = digits.chars();
    let mut index = 0;
    for token in tokens {
        match token {
            NumToken::Digit(p) => {
                let d = value_digits.next().unwrap_or('0');
                if index < significant || *p == Placeholder::Zero {
                    out.push(d);
                } else {
                    out.extend(p.pad());
                }
                index += 1;
            }
            other => out.extend(other.literal_char()),
        }
    }
}

/// Decimal expansion of a non-negative finite value at 15 significant digits.
///
/// Returns integer digits (no leading zeros, empty for zero) and all fraction digits.
fn expand(value: f64) -> (String, String) {
    let sci = format!("{value:.14e}");
    let (mantissa, exponent) = sci.split_once('e').unwrap_or((sci.as_str(), "0"));
    let exponent: i64 = exponent.parse().unwrap_or(0);
    let digits: String = mantissa.chars().filter(char::is_ascii_digit).collect();

    let (int, frac) = match usize::try_from(exponent) {
        Ok(exp) => {
            let split = exp + 1;
            if digits.len() > split {
                let (int, frac) = digits.split_at(split);
                (int.to_string(), frac.to_string())
            } else {
                (format!("{digits:0<split$}"), String::new())
            }
        }
        Err(_) => {
            let zeros = usize::try_from(-exponent - 1).unwrap_or(0);
            (String::new(), format!("{}{digits}", "0".repeat(zeros)))
        }
    };
    (int.trim_start_matches('0').to_string(), frac)
}

/// Round to `decimals` fraction digits, returning (integer digits, fraction digits).
///
/// A round-up that would ripple through a trailing 9 recomputes the value with
/// the increment applied and runs the pass again, once.
fn round_digits(value: f64, decimals: usize) -> (String, String) {
    let mut value = value;
    let mut retried = false;
    loop {
        let (int, frac) = expand(value);
        let kept: String = frac
            .chars()
            .chain(std::iter::repeat('0'))
            .take(decimals)
            .collect();
        let next = frac.chars().nth(decimals).unwrap_or('0');
        if next < '5' {
            return (int, kept);
        }

        let all = format!("{int}{kept}");
        if all.ends_with('9') && !retried {
            retried = true;
            let truncated: f64 = format!("0{int}.{kept}0").parse().unwrap_or(value);
            let step = 10f64.powi(-i32::try_from(decimals).unwrap_or(i32::MAX));
            value = truncated + step;
            continue;
        }

        let bumped = increment_digits(&all);
        let split = bumped.len().saturating_sub(decimals);
        let (int, kept) = bumped.split_at(split);
        return (int.trim_start_matches('0').to_string(), kept.to_string());
    }
}

fn increment_digits(digits: &str) -> String {
    let mut bytes = digits.as_bytes().to_vec();
    let mut carry = true;
    for b in bytes.iter_mut().rev() {
        if *b == b'9' {
            *b = b'0';
        } else {
            *b += 1;
            carry = false;
            break;
        }
    }
    if carry {
        bytes.insert(0, b'1');
    }
    String::from_utf8(bytes).unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Date/time sections
// ---------------------------------------------------------------------------

/// Serial 2958466 is 10000-01-01.
const MAX_SERIAL: f64 = 2_958_466.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TimeUnit {
    Hours,
    Minutes,
    Seconds,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum DateToken {
    Year { long: bool },
    /// m, mm, mmm, mmmm, mmmmm
    Month(usize),
    /// d, dd, ddd, dddd
    Day(usize),
    Hour { padded: bool },
    Minute { padded: bool },
    Second { padded: bool },
    /// `.0`, `.00`, `.000` after seconds
    SubSecond(usize),
    /// `[h]`, `[mm]`, `[ss]`
    Elapsed { unit: TimeUnit, width: usize },
    AmPm,
    AP { lower: bool },
    Literal(String),
}

fn push_literal(tokens: &mut Vec<DateToken>, text: &str) {
    if let Some(DateToken::Literal(last)) = tokens.last_mut() {
        last.push_str(text);
    } else {
        tokens.push(DateToken::Literal(text.to_string()));
    }
}

fn matches_ci(chars: &[char], at: usize, pattern: &str) -> bool {
    pattern
        .chars()
        .enumerate()
        .all(|(k, p)| chars.get(at + k).is_some_and(|c| c.eq_ignore_ascii_case(&p)))
}

fn tokenize_date(code: &str) -> Result<Vec<DateToken>> {
    let malformed = |why: &str| XlhtmlError::Format(format!("{why} in {code:?}"));
    let chars: Vec<char> = code.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;
    let mut in_time = false;

    while let Some(&c) = chars.get(i) {
        let lower = c.to_ascii_lowercase();
        match lower {
            '"' => {
                let end = (i + 1..chars.len())
                    .find(|&j| chars.get(j) == Some(&'"'))
                    .ok_or_else(|| malformed("unterminated quote"))?;
                let text: String = chars.get(i + 1..end).unwrap_or_default().iter().collect();
                push_literal(&mut tokens, &text);
                i = end + 1;
            }
            '\\' | '*' => {
                let next = chars.get(i + 1).ok_or_else(|| malformed("dangling escape"))?;
                push_literal(&mut tokens, &next.to_string());
                i += 2;
            }
            '_' => {
                push_literal(&mut tokens, " ");
                i += 2;
            }
            '[' => {
                let end = (i + 1..chars.len())
                    .find(|&j| chars.get(j) == Some(&']'))
                    .ok_or_else(|| malformed("unterminated bracket"))?;
                let inner: String = chars.get(i + 1..end).unwrap_or_default().iter().collect();
                if is_elapsed_block(&inner) {
                    let unit = match inner.chars().next().map(|c| c.to_ascii_lowercase()) {
                        Some('h') => TimeUnit::Hours,
                        Some('m') => TimeUnit::Minutes,
                        _ => TimeUnit::Seconds,
                    };
                    in_time = unit != TimeUnit::Seconds;
                    tokens.push(DateToken::Elapsed {
                        unit,
                        width: inner.len(),
                    });
                }
                i = end + 1;
            }
            'a' if matches_ci(&chars, i, "am/pm") => {
                tokens.push(DateToken::AmPm);
                i += 5;
            }
            'a' if matches_ci(&chars, i, "a/p") => {
                tokens.push(DateToken::AP {
                    lower: c.is_ascii_lowercase(),
                });
                i += 3;
            }
            '.' if matches!(tokens.last(), Some(DateToken::Second { .. }))
                && chars.get(i + 1) == Some(&'0') =>
            {
                let zeros = chars
                    .get(i + 1..)
                    .unwrap_or_default()
                    .iter()
                    .take_while(|&&z| z == '0')
                    .count();
                tokens.push(DateToken::SubSecond(zeros.min(3)));
                i += 1 + zeros;
            }
            'y' | 'm' | 'd' | 'h' | 's' => {
                let count = chars
                    .get(i..)
                    .unwrap_or_default()
                    .iter()
                    .take_while(|n| n.to_ascii_lowercase() == lower)
                    .count();
                let token = match lower {
                    'y' => DateToken::Year { long: count >= 3 },
                    'd' => DateToken::Day(count.min(4)),
                    'h' => {
                        in_time = true;
                        DateToken::Hour { padded: count >= 2 }
                    }
                    's' => {
                        in_time = false;
                        DateToken::Second { padded: count >= 2 }
                    }
                    _ if count <= 2 && (in_time || is_followed_by_seconds(&chars, i + count)) => {
                        DateToken::Minute { padded: count >= 2 }
                    }
                    _ => DateToken::Month(count.min(5)),
                };
                tokens.push(token);
                i += count;
            }
            _ => {
                push_literal(&mut tokens, &c.to_string());
                i += 1;
            }
        }
    }
    Ok(tokens)
}

/// Check if 'm' at position is followed by 's' (making it minutes, not months)
fn is_followed_by_seconds(chars: &[char], start: usize) -> bool {
    for ch in chars.iter().skip(start) {
        match ch.to_ascii_lowercase() {
            's' => return true,
            'h' | 'y' | 'd' | 'm' => return false,
            _ => {}
        }
    }
    false
}

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

const DAY_NAMES: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

fn name_prefix(name: &str, len: usize) -> &str {
    name.get(..len).unwrap_or(name)
}

/// Render a serial date/time. `None` when the serial is outside the calendar.
#[allow(clippy::cast_possible_truncation)]
fn render_date(value: f64, tokens: &[DateToken], date1904: bool) -> Option<String> {
    if !(0.0..MAX_SERIAL).contains(&value) {
        return None;
    }

    let precision = tokens
        .iter()
        .filter_map(|t| match t {
            DateToken::SubSecond(n) => Some(*n),
            _ => None,
        })
        .max()
        .unwrap_or(0);
    let ticks_per_sec = 10i64.pow(u32::try_from(precision).ok()?);
    let ticks_per_day = 86_400 * ticks_per_sec;
    let total_ticks = (value * ticks_per_day as f64).round() as i64;
    let days = total_ticks / ticks_per_day;
    let tick_of_day = total_ticks % ticks_per_day;

    let epoch = if date1904 {
        NaiveDate::from_ymd_opt(1904, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(1899, 12, 30)?
    };
    let date = epoch.checked_add_days(Days::new(u64::try_from(days).ok()?))?;
    if date.year() > 9999 {
        return None;
    }

    let secs_of_day = tick_of_day / ticks_per_sec;
    let sub_ticks = tick_of_day % ticks_per_sec;
    let total_secs = total_ticks / ticks_per_sec;
    let hour = secs_of_day / 3600;
    let minute = secs_of_day % 3600 / 60;
    let second = secs_of_day % 60;

    let twelve_hour = tokens
        .iter()
        .any(|t| matches!(t, DateToken::AmPm | DateToken::AP { .. }));
    let shown_hour = if twelve_hour {
        match hour % 12 {
            0 => 12,
            h => h,
        }
    } else {
        hour
    };
    let pm = hour >= 12;

    let month0 = usize::try_from(date.month0()).ok()?;
    let month_name = MONTH_NAMES.get(month0).copied().unwrap_or_default();
    let weekday = usize::try_from(date.weekday().num_days_from_sunday()).ok()?;
    let day_name = DAY_NAMES.get(weekday).copied().unwrap_or_default();

    let mut out = String::new();
    for token in tokens {
        match token {
            DateToken::Year { long: true } => out.push_str(&format!("{:04}", date.year())),
            DateToken::Year { long: false } => {
                out.push_str(&format!("{:02}", date.year() % 100));
            }
            DateToken::Month(1) => out.push_str(&date.month().to_string()),
            DateToken::Month(2) => out.push_str(&format!("{:02}", date.month())),
            DateToken::Month(3) => out.push_str(name_prefix(month_name, 3)),
            DateToken::Month(4) => out.push_str(month_name),
            DateToken::Month(_) => out.push_str(name_prefix(month_name, 1)),
            DateToken::Day(1) => out.push_str(&date.day().to_string()),
            DateToken::Day(2) => out.push_str(&format!("{:02}", date.day())),
            DateToken::Day(3) => out.push_str(name_prefix(day_name, 3)),
            DateToken::Day(_) => out.push_str(day_name),
            DateToken::Hour { padded } => out.push_str(&pad2(shown_hour, *padded)),
            DateToken::Minute { padded } => out.push_str(&pad2(minute, *padded)),
            DateToken::Second { padded } => out.push_str(&pad2(second, *padded)),
            DateToken::SubSecond(n) => {
                let digits = format!("{sub_ticks:0precision$}");
                out.push('.');
                out.push_str(name_prefix(&digits, *n));
            }
            DateToken::Elapsed { unit, width } => {
                let amount = match unit {
                    TimeUnit::Hours => total_secs / 3600,
                    TimeUnit::Minutes => total_secs / 60,
                    TimeUnit::Seconds => total_secs,
                };
                let width = *width;
                out.push_str(&format!("{amount:0width$}"));
            }
            DateToken::AmPm => out.push_str(if pm { "PM" } else { "AM" }),
            DateToken::AP { lower } => out.push(match (pm, lower) {
                (true, true) => 'p',
                (true, false) => 'P',
                (false, true) => 'a',
                (false, false) => 'A',
            }),
            DateToken::Literal(text) => out.push_str(text),
        }
    }
    Some(out)
}

fn pad2(n: i64, padded: bool) -> String {
    if padded {
        format!("{n:02}")
    } else {
        n.to_string()
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]
mod tests {
    use super::*;

    fn fmt(value: f64, code: &str) -> String {
        format_number(value, code, false)
    }

    #[test]
    fn test_general_format() {
        assert_eq!(format_general(42.0), "42");
        assert_eq!(format_general(-2.5), "-2.5");
        assert_eq!(format_general(0.1 + 0.2), "0.3");
        assert_eq!(format_general(123_456_789_012.0), "1.23457E+11");
        assert_eq!(format_general(0.000_012_5), "1.25E-05");
    }

    #[test]
    fn test_split_sections_respects_quotes_and_brackets() {
        assert_eq!(split_sections(r#"0;"a;b";[<0;x]0"#), vec!["0", r#""a;b""#, "[<0;x]0"]);
        assert_eq!(split_sections(r"0\;0;0"), vec![r"0\;0", "0"]);
    }

    #[test]
    fn test_spec_section_layout() {
        let spec = NumberFormatSpec::parse("0;(0);\"-\";@");
        assert_eq!(spec.section_count(), 4);
        assert!(spec.negative.as_ref().unwrap().has_sign);
        assert!(spec.text.as_ref().unwrap().has_text_slot);
        assert!(!spec.positive.is_date);
    }

    #[test]
    fn test_grouping_and_decimals() {
        assert_eq!(fmt(1234.5, "#,##0.00"), "1,234.50");
        assert_eq!(fmt(1_234_567.0, "#,##0"), "1,234,567");
        assert_eq!(fmt(12.0, "#,##0"), "12");
        assert_eq!(fmt(0.5, "#.00"), ".50");
        assert_eq!(fmt(0.5, "0.00"), "0.50");
    }

    #[test]
    fn test_hash_and_question_padding() {
        assert_eq!(fmt(1.5, "0.0#"), "1.5");
        assert_eq!(fmt(1.25, "0.0#"), "1.25");
        assert_eq!(fmt(1.5, "0.0?"), "1.5 ");
        assert_eq!(fmt(5.0, "??0"), "  5");
        assert_eq!(fmt(7.0, "000"), "007");
    }

    #[test]
    fn test_literals_between_placeholders() {
        assert_eq!(fmt(5_551_234.0, "000-0000"), "555-1234");
        assert_eq!(fmt(42.0, r#"0" units""#), "42 units");
        assert_eq!(fmt(42.0, r"\$0"), "$42");
        assert_eq!(fmt(42.0, "0_)"), "42 ");
    }

    #[test]
    fn test_thousands_scaling() {
        assert_eq!(fmt(1_234_567.0, "0.0,,"), "1.2");
        assert_eq!(fmt(12_345.0, "#,##0,"), "12");
    }

    #[test]
    fn test_percent() {
        assert_eq!(fmt(0.5, "0%"), "50%");
        assert_eq!(fmt(0.1234, "0.00%"), "12.34%");
    }

    #[test]
    fn test_rounding_carry() {
        assert_eq!(fmt(9.995, "0.00"), "10.00");
        assert_eq!(fmt(0.999, "0.00"), "1.00");
        assert_eq!(fmt(99.96, "#,##0.0"), "100.0");
        assert_eq!(fmt(1.005, "0.00"), "1.01");
        assert_eq!(fmt(2.5, "0"), "3");
    }

    #[test]
    fn test_round_digits_splits() {
        assert_eq!(round_digits(0.0, 2), (String::new(), "00".to_string()));
        assert_eq!(round_digits(999.96, 1), ("1000".to_string(), "0".to_string()));
        assert_eq!(round_digits(0.7, 0), ("1".to_string(), String::new()));
    }

    #[test]
    fn test_negative_sections() {
        assert_eq!(fmt(-5.0, "0;-0"), "-5");
        assert_eq!(fmt(-5.0, "0;(0)"), "(5)");
        assert_eq!(fmt(-5.0, "0;0"), "-5");
        assert_eq!(fmt(-5.0, "0.0"), "-5.0");
        assert_eq!(fmt(-5.0, "0;;0"), "");
    }

    #[test]
    fn test_zero_section() {
        assert_eq!(fmt(0.0, "0;-0;\"zero\""), "zero");
        assert_eq!(fmt(0.0, "0.0;-0.0"), "0.0");
    }

    #[test]
    fn test_scientific() {
        assert_eq!(fmt(12345.0, "0.00E+00"), "1.23E+04");
        assert_eq!(fmt(0.00012, "0.0E+00"), "1.2E-04");
        assert_eq!(fmt(12345.0, "0.0E-0"), "1.2E4");
        assert_eq!(fmt(0.0, "0.00E+00"), "0.00E+00");
        assert_eq!(fmt(9.999, "0.00E+00"), "1.00E+01");
    }

    #[test]
    fn test_fractions() {
        assert_eq!(fmt(1.5, "# ?/?"), "1 1/2");
        assert_eq!(fmt(0.75, "?/?"), "3/4");
        assert_eq!(fmt(2.0, "# ?/?"), "2");
        assert_eq!(fmt(0.0, "# ?/?"), "0");
        assert_eq!(fmt(1.25, "?/?"), "5/4");
        assert_eq!(fmt(0.333, "# ??/??"), "  1/3 ");
        assert_eq!(fmt(3.3, "# ?/8"), "3 2/8");
    }

    #[test]
    fn test_fraction_of_huge_values() {
        assert_eq!(fmt(1e19, "?/8"), "1E+19");
        assert_eq!(fmt(3e18, "?/8"), "3E+18");
        assert_eq!(fmt(1e300, "# ?/?"), "1E+300");
        // below 2^53 the numerator still fits
        assert_eq!(fmt(1e15, "?/8"), "8000000000000000/8");
        // numerator overflow falls back to plain digits
        assert!(!fmt(9.0e15, "?/1000").is_empty());
    }

    #[test]
    fn test_approximate_fraction() {
        assert_eq!(approximate_fraction(0.5, 9), (1, 2));
        assert_eq!(approximate_fraction(0.0, 9), (0, 1));
        assert_eq!(approximate_fraction(0.142_857, 9), (1, 7));
        assert_eq!(approximate_fraction(0.3141, 99), (11, 35));
    }

    #[test]
    fn test_dates() {
        assert_eq!(fmt(45_000.0, "yyyy-mm-dd"), "2023-03-15");
        assert_eq!(fmt(45_000.0, "d-mmm-yy"), "15-Mar-23");
        assert_eq!(fmt(45_000.0, "dddd, mmmm d"), "Wednesday, March 15");
        assert_eq!(fmt(45_000.0, "mmmmm"), "M");
        assert_eq!(fmt(1.0, "yyyy-mm-dd"), "1899-12-31");
        assert_eq!(fmt(61.0, "yyyy-mm-dd"), "1900-03-01");
    }

    #[test]
    fn test_date1904() {
        assert_eq!(format_number(0.0, "yyyy-mm-dd", true), "1904-01-01");
        assert_eq!(format_number(1.5, "yyyy-mm-dd hh:mm", true), "1904-01-02 12:00");
    }

    #[test]
    fn test_times() {
        assert_eq!(fmt(0.75, "h:mm"), "18:00");
        assert_eq!(fmt(0.75, "h:mm AM/PM"), "6:00 PM");
        assert_eq!(fmt(0.0, "h:mm a/p"), "12:00 a");
        assert_eq!(fmt(0.5 + 1.0 / 86_400.0, "hh:mm:ss"), "12:00:01");
        assert_eq!(fmt(1.5, "[h]:mm"), "36:00");
        assert_eq!(fmt(0.25, "[mm]"), "360");
        assert_eq!(fmt(1.0 / 86_400.0 * 1.25, "ss.00"), "01.25");
        assert_eq!(fmt(45_000.5, "m/d/yy h:mm"), "3/15/23 12:00");
        assert_eq!(fmt(0.001, "mm:ss"), "01:26");
    }

    #[test]
    fn test_invalid_serial_falls_back_to_general() {
        assert_eq!(fmt(-1.0, "yyyy-mm-dd"), "-1");
        assert_eq!(fmt(3_000_000.0, "yyyy"), "3000000");
    }

    #[test]
    fn test_text_sections() {
        assert_eq!(format_text("abc", "@"), "abc");
        assert_eq!(format_text("abc", "0;0;0;\"[\"@\"]\""), "[abc]");
        assert_eq!(format_text("abc", "0.00"), "abc");
        assert_eq!(format_text("abc", r#""Name: "@"#), "Name: abc");
    }

    #[test]
    fn test_general_token_with_literals() {
        assert_eq!(fmt(12.5, r#""$"General"#), "$12.5");
        assert_eq!(fmt(7.0, "General"), "7");
        assert_eq!(fmt(-7.0, "General"), "-7");
    }

    #[test]
    fn test_brackets_are_skipped() {
        assert_eq!(fmt(5.0, "[Red]0.0"), "5.0");
        assert_eq!(fmt(-5.0, "0;[Red]-0"), "-5");
        assert_eq!(fmt(150.0, "[>100]0"), "150");
    }

    #[test]
    fn test_malformed_code_returns_raw() {
        let spec = NumberFormatSpec::parse("0\"unterminated");
        assert_eq!(spec.format_number(3.5, "3.5", false), "3.5");
        let spec = NumberFormatSpec::parse("[Red0");
        assert_eq!(spec.format_number(3.5, "3.5", false), "3.5");
    }

    #[test]
    fn test_format_value_parses_numeric_text() {
        let spec = NumberFormatSpec::parse("#,##0.00");
        assert_eq!(spec.format(&CellValue::from("1234.5"), false), "1,234.50");
        assert_eq!(spec.format(&CellValue::from("n/a"), false), "n/a");
    }

    #[test]
    fn test_is_date_format() {
        assert!(is_date_format("yyyy-mm-dd"));
        assert!(is_date_format("[h]:mm:ss"));
        assert!(is_date_format("h:mm AM/PM"));
        assert!(!is_date_format("#,##0.00"));
        assert!(!is_date_format("[Red]0.00"));
        assert!(!is_date_format(r#"0 "days""#));
        assert!(!is_date_format("General"));
        assert!(!is_date_format("0.00E+00"));
    }

    #[test]
    fn test_resolve_format_code() {
        let custom = vec![NumFmt {
            id: 164,
            code: "0.000".to_string(),
        }];
        assert_eq!(resolve_format_code(164, &custom), Some("0.000"));
        assert_eq!(resolve_format_code(4, &custom), Some("#,##0.00"));
        assert_eq!(resolve_format_code(30, &custom), None);
    }
}
