//! `/chaos` command parsing.

/// Prefix every chaos command starts with.
pub const COMMAND_PREFIX: &str = "/chaos";

pub const DEFAULT_INTERVAL_SECS: u64 = 1;
pub const DEFAULT_MESSAGE_COUNT: u32 = 10;

pub const MIN_INTERVAL_SECS: u64 = 1;
pub const MAX_INTERVAL_SECS: u64 = 60;
pub const MIN_MESSAGE_COUNT: u32 = 1;
pub const MAX_MESSAGE_COUNT: u32 = 100;

/// Parameters of a chaos loop, always within the allowed ranges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChaosParams {
    pub interval_secs: u64,
    pub count: u32,
}

impl ChaosParams {
    /// Build parameters from raw user values, applying defaults and clamping.
    pub fn clamped(interval: Option<i64>, count: Option<i64>) -> Self {
        let interval = interval
            .unwrap_or(DEFAULT_INTERVAL_SECS as i64)
            .clamp(MIN_INTERVAL_SECS as i64, MAX_INTERVAL_SECS as i64);
        let count = count
            .unwrap_or(i64::from(DEFAULT_MESSAGE_COUNT))
            .clamp(i64::from(MIN_MESSAGE_COUNT), i64::from(MAX_MESSAGE_COUNT));
        Self {
            interval_secs: interval as u64,
            count: count as u32,
        }
    }

    /// Confirmation sent when a loop starts.
    pub fn confirmation(&self) -> String {
        format!(
            "Chaos starting: {} messages every {} second(s).",
            self.count, self.interval_secs
        )
    }
}

impl Default for ChaosParams {
    fn default() -> Self {
        Self {
            interval_secs: DEFAULT_INTERVAL_SECS,
            count: DEFAULT_MESSAGE_COUNT,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChaosCommand {
    Start(ChaosParams),
    Stop,
}

/// Returns `true` if `body` should be treated as a chaos command.
pub fn is_chaos_command(body: &str) -> bool {
    body.to_lowercase().starts_with(COMMAND_PREFIX)
}

/// Classify a message body.
///
/// Returns `None` for anything that is not a text `/chaos` command. Arguments
/// never cause a rejection: bad or missing numbers fall back to the defaults
/// and everything is clamped into range.
pub fn parse_command(body: &str, is_text: bool) -> Option<ChaosCommand> {
    if !is_text {
        return None;
    }
    let body = body.to_lowercase();
    if !body.starts_with(COMMAND_PREFIX) {
        return None;
    }

    let mut args = body.split_whitespace().skip(1);
    let first = args.next();
    if first == Some("stop") {
        return Some(ChaosCommand::Stop);
    }
    let second = args.next();

    Some(ChaosCommand::Start(ChaosParams::clamped(
        first.and_then(parse_leading_int),
        second.and_then(parse_leading_int),
    )))
}

/// Read an optional sign followed by the leading run of ASCII digits.
///
/// `"5x"` reads as 5 and `"3.7"` as 3. Values too large for `i64` saturate.
fn parse_leading_int(token: &str) -> Option<i64> {
    let (negative, digits) = match token.as_bytes().first() {
        Some(b'-') => (true, &token[1..]),
        Some(b'+') => (false, &token[1..]),
        _ => (false, token),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }

    let magnitude = digits[..end].bytes().fold(0i64, |acc, d| {
        acc.saturating_mul(10).saturating_add(i64::from(d - b'0'))
    });
    Some(if negative { -magnitude } else { magnitude })
}

#[cfg(test)]
mod tests {
    use {super::*, rstest::rstest};

    fn start(interval_secs: u64, count: u32) -> Option<ChaosCommand> {
        Some(ChaosCommand::Start(ChaosParams {
            interval_secs,
            count,
        }))
    }

    #[rstest]
    #[case::bare("/chaos", start(1, 10))]
    #[case::both("/chaos 5 3", start(5, 3))]
    #[case::interval_only("/chaos 7", start(7, 10))]
    #[case::interval_too_high("/chaos 999 3", start(60, 3))]
    #[case::count_too_high("/chaos 2 5000", start(2, 100))]
    #[case::zero_values("/chaos 0 0", start(1, 1))]
    #[case::negative_values("/chaos -5 -1", start(1, 1))]
    #[case::non_numeric("/chaos fast many", start(1, 10))]
    #[case::numeric_prefix("/chaos 5x 3.7", start(5, 3))]
    #[case::huge("/chaos 99999999999999999999999 2", start(60, 2))]
    #[case::extra_spaces("/chaos    4    8   ", start(4, 8))]
    #[case::uppercase("/CHAOS 3 4", start(3, 4))]
    #[case::glued_prefix("/chaosmonkey", start(1, 10))]
    #[case::stop("/chaos stop", Some(ChaosCommand::Stop))]
    #[case::stop_uppercase("/Chaos STOP", Some(ChaosCommand::Stop))]
    #[case::stop_trailing("/chaos stop now", Some(ChaosCommand::Stop))]
    #[case::stop_as_count("/chaos 5 stop", start(5, 10))]
    #[case::not_command("hello /chaos", None)]
    #[case::other_command("/help", None)]
    #[case::leading_space(" /chaos", None)]
    #[case::empty("", None)]
    fn parses(#[case] body: &str, #[case] expected: Option<ChaosCommand>) {
        assert_eq!(parse_command(body, true), expected);
    }

    #[test]
    fn non_text_is_ignored() {
        assert_eq!(parse_command("/chaos 5 3", false), None);
    }

    #[rstest]
    #[case(i64::MIN)]
    #[case(-1)]
    #[case(0)]
    #[case(1)]
    #[case(30)]
    #[case(60)]
    #[case(61)]
    #[case(100)]
    #[case(101)]
    #[case(i64::MAX)]
    fn clamped_values_stay_in_range(#[case] raw: i64) {
        let params = ChaosParams::clamped(Some(raw), Some(raw));
        assert!((MIN_INTERVAL_SECS..=MAX_INTERVAL_SECS).contains(&params.interval_secs));
        assert!((MIN_MESSAGE_COUNT..=MAX_MESSAGE_COUNT).contains(&params.count));
    }

    #[test]
    fn missing_values_use_defaults() {
        assert_eq!(ChaosParams::clamped(None, None), ChaosParams::default());
    }

    #[test]
    fn confirmation_text() {
        assert_eq!(
            ChaosParams::default().confirmation(),
            "Chaos starting: 10 messages every 1 second(s)."
        );
    }

    #[rstest]
    #[case("42", Some(42))]
    #[case("+7", Some(7))]
    #[case("-3", Some(-3))]
    #[case("12abc", Some(12))]
    #[case("abc", None)]
    #[case("-", None)]
    #[case("", None)]
    fn leading_int(#[case] token: &str, #[case] expected: Option<i64>) {
        assert_eq!(parse_leading_int(token), expected);
    }

    #[test]
    fn prefix_check() {
        assert!(is_chaos_command("/CHAOS"));
        assert!(!is_chaos_command("chaos"));
    }
}
