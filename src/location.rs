//! Location normalization: consistent short city/remote names across listings.

/// Canonical city mappings. Declaration order matters: the prefix-lookup step
/// in [`normalize_location`] walks this table top to bottom.
const CITY_MAPPINGS: &[(&str, &str)] = &[
    // Major US cities.
    ("new york", "NYC"),
    ("new york city", "NYC"),
    ("manhattan", "NYC"),
    ("brooklyn", "NYC"),
    ("san francisco", "SF"),
    ("san francisco bay area", "SF Bay Area"),
    ("bay area", "SF Bay Area"),
    ("los angeles", "LA"),
    ("washington dc", "DC"),
    ("washington, dc", "DC"),
    ("washington d.c.", "DC"),
    ("seattle", "Seattle"),
    ("boston", "Boston"),
    ("austin", "Austin"),
    ("chicago", "Chicago"),
    ("denver", "Denver"),
    ("miami", "Miami"),
    ("atlanta", "Atlanta"),
    ("portland", "Portland"),
    ("philadelphia", "Philly"),
    // Bay Area specifics.
    ("palo alto", "Palo Alto"),
    ("mountain view", "Mountain View"),
    ("menlo park", "Menlo Park"),
    ("sunnyvale", "Sunnyvale"),
    ("san jose", "San Jose"),
    ("cupertino", "Cupertino"),
    ("redwood city", "Redwood City"),
    ("south san francisco", "South SF"),
    // International.
    ("london", "London"),
    ("toronto", "Toronto"),
    ("vancouver", "Vancouver"),
    ("dublin", "Dublin"),
    ("amsterdam", "Amsterdam"),
    ("berlin", "Berlin"),
    ("paris", "Paris"),
    ("singapore", "Singapore"),
    ("tokyo", "Tokyo"),
    ("sydney", "Sydney"),
    ("tel aviv", "Tel Aviv"),
    ("bangalore", "Bangalore"),
    ("bengaluru", "Bangalore"),
    ("hyderabad", "Hyderabad"),
    ("mumbai", "Mumbai"),
];

/// US state names and their two-letter abbreviations, for suffix cleanup.
const US_STATES: &[(&str, &str)] = &[
    ("alabama", "AL"),
    ("alaska", "AK"),
    ("arizona", "AZ"),
    ("arkansas", "AR"),
    ("california", "CA"),
    ("colorado", "CO"),
    ("connecticut", "CT"),
    ("delaware", "DE"),
    ("florida", "FL"),
    ("georgia", "GA"),
    ("hawaii", "HI"),
    ("idaho", "ID"),
    ("illinois", "IL"),
    ("indiana", "IN"),
    ("iowa", "IA"),
    ("kansas", "KS"),
    ("kentucky", "KY"),
    ("louisiana", "LA"),
    ("maine", "ME"),
    ("maryland", "MD"),
    ("massachusetts", "MA"),
    ("michigan", "MI"),
    ("minnesota", "MN"),
    ("mississippi", "MS"),
    ("missouri", "MO"),
    ("montana", "MT"),
    ("nebraska", "NE"),
    ("nevada", "NV"),
    ("new hampshire", "NH"),
    ("new jersey", "NJ"),
    ("new mexico", "NM"),
    ("new york", "NY"),
    ("north carolina", "NC"),
    ("north dakota", "ND"),
    ("ohio", "OH"),
    ("oklahoma", "OK"),
    ("oregon", "OR"),
    ("pennsylvania", "PA"),
    ("rhode island", "RI"),
    ("south carolina", "SC"),
    ("south dakota", "SD"),
    ("tennessee", "TN"),
    ("texas", "TX"),
    ("utah", "UT"),
    ("vermont", "VT"),
    ("virginia", "VA"),
    ("washington", "WA"),
    ("west virginia", "WV"),
    ("wisconsin", "WI"),
    ("wyoming", "WY"),
];

macro_rules! re {
    ($name:ident, $($e:expr),* $(,)?) => {
        static $name: std::sync::LazyLock<regex::Regex> = std::sync::LazyLock::new(
            || regex::Regex::new(concat!($($e),*)).unwrap(),
        );
    };
}

/// Normalizes a location string to a consistent short form.
///
/// Examples:
/// - "New York, NY" -> "NYC"
/// - "San Francisco, California" -> "SF"
/// - "Remote - US" -> "Remote (US)"
/// - "London, United Kingdom" -> "London"
///
/// Pure function of the input: absent (or empty) input yields absent output,
/// and unrecognized input is returned unchanged.
pub fn normalize_location(location: Option<&str>) -> Option<String> {
    let original = match location {
        Some(location) if !location.is_empty() => location,
        _ => return None,
    };
    let loc = original.trim();

    // Remote variations: "Remote - US", "Remote / EMEA", bare "Remote".
    re!(REMOTE_RE, r"(?i)^remote\s*[-–—/]\s*(.+)$");
    if let Some(captures) = REMOTE_RE.captures(loc) {
        let region = captures[1].trim().to_string();
        return Some(match region.to_lowercase().as_str() {
            "united states" | "usa" | "us" => "Remote (US)".to_string(),
            "united kingdom" | "uk" => "Remote (UK)".to_string(),
            "emea" => "Remote (EMEA)".to_string(),
            "apac" => "Remote (APAC)".to_string(),
            _ => format!("Remote ({region})"),
        });
    }
    if loc.eq_ignore_ascii_case("remote") {
        return Some("Remote".to_string());
    }

    // Exact lookup on the city part (everything before the first comma).
    let parts: Vec<&str> = loc.split(',').map(str::trim).collect();
    let city_part = parts[0].to_lowercase();
    if let Some((_, abbrev)) = CITY_MAPPINGS.iter().find(|(city, _)| *city == city_part) {
        return Some((*abbrev).to_string());
    }

    // Prefix lookup over the full string, in table order.
    let full_lower = loc.to_lowercase();
    for (city, abbrev) in CITY_MAPPINGS {
        if full_lower.starts_with(city) {
            return Some((*abbrev).to_string());
        }
    }

    // "City, ST": the state confirms a US city our table doesn't know.
    if parts.len() >= 2 {
        let state_or_country = parts[1].to_lowercase();
        let is_state = US_STATES.iter().any(|(name, abbrev)| {
            *name == state_or_country || abbrev.eq_ignore_ascii_case(&state_or_country)
        });
        if is_state {
            return Some(title_case(parts[0]));
        }
    }

    Some(original.to_string())
}

/// Checks whether a location indicates remote work, and extracts the remote
/// region when one follows a separator (e.g. "Remote - US" -> (true, "US")).
pub fn extract_remote_info(location: Option<&str>) -> (bool, Option<String>) {
    let loc = match location {
        Some(location) if !location.is_empty() => location.to_lowercase(),
        _ => return (false, None),
    };

    if loc.contains("remote") {
        re!(REMOTE_REGION_RE, r"remote\s*[-–—/]\s*(\w+)");
        let region = REMOTE_REGION_RE
            .captures(&loc)
            .map(|captures| captures[1].to_uppercase());
        return (true, region);
    }

    let hybrid = ["hybrid", "flexible", "work from home", "wfh"];
    if hybrid.iter().any(|indicator| loc.contains(indicator)) {
        return (true, None);
    }

    (false, None)
}

fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut at_word_start = true;
    for c in s.chars() {
        if c.is_alphabetic() {
            if at_word_start {
                out.extend(c.to_uppercase());
            } else {
                out.extend(c.to_lowercase());
            }
            at_word_start = false;
        } else {
            out.push(c);
            at_word_start = true;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn norm(location: &str) -> Option<String> {
        normalize_location(Some(location))
    }

    #[test]
    fn absent_input() {
        assert_eq!(normalize_location(None), None);
        assert_eq!(normalize_location(Some("")), None);
    }

    #[test]
    fn city_table() {
        assert_eq!(norm("New York, NY").as_deref(), Some("NYC"));
        assert_eq!(norm("Brooklyn"), Some("NYC".to_string()));
        assert_eq!(norm("San Francisco, California").as_deref(), Some("SF"));
        assert_eq!(norm("South San Francisco, CA").as_deref(), Some("South SF"));
        assert_eq!(norm("Austin, TX").as_deref(), Some("Austin"));
        assert_eq!(norm("London, United Kingdom").as_deref(), Some("London"));
        assert_eq!(norm("Bengaluru"), Some("Bangalore".to_string()));
    }

    #[test]
    fn prefix_lookup() {
        // "washington, dc" only matches via the full-string prefix scan,
        // because the comma split strips the "dc" from the city part.
        assert_eq!(norm("Washington, DC").as_deref(), Some("DC"));
        assert_eq!(norm("Seattle (Hybrid)").as_deref(), Some("Seattle"));
    }

    #[test]
    fn remote_variants() {
        assert_eq!(norm("Remote").as_deref(), Some("Remote"));
        assert_eq!(norm("REMOTE").as_deref(), Some("Remote"));
        assert_eq!(norm("Remote - US").as_deref(), Some("Remote (US)"));
        assert_eq!(norm("Remote - United States").as_deref(), Some("Remote (US)"));
        assert_eq!(norm("Remote – United Kingdom").as_deref(), Some("Remote (UK)"));
        assert_eq!(norm("Remote-EMEA").as_deref(), Some("Remote (EMEA)"));
        assert_eq!(norm("Remote / APAC").as_deref(), Some("Remote (APAC)"));
        // Unmapped regions keep their original casing.
        assert_eq!(norm("Remote - Canada").as_deref(), Some("Remote (Canada)"));
    }

    #[test]
    fn state_suffix_cleanup() {
        assert_eq!(norm("Eagan, MN").as_deref(), Some("Eagan"));
        assert_eq!(norm("springfield, Illinois").as_deref(), Some("Springfield"));
    }

    #[test]
    fn fallback_is_verbatim() {
        // Already-normalized and unknown strings pass through unchanged.
        assert_eq!(norm("NYC").as_deref(), Some("NYC"));
        assert_eq!(norm("Atlantis").as_deref(), Some("Atlantis"));
        assert_eq!(norm("Zurich, Switzerland").as_deref(), Some("Zurich, Switzerland"));
    }

    #[test]
    fn remote_info() {
        assert_eq!(extract_remote_info(None), (false, None));
        assert_eq!(extract_remote_info(Some("New York, NY")), (false, None));
        assert_eq!(extract_remote_info(Some("Remote")), (true, None));
        assert_eq!(
            extract_remote_info(Some("Remote-EMEA")),
            (true, Some("EMEA".to_string()))
        );
        // Only the first word after the separator is captured.
        assert_eq!(
            extract_remote_info(Some("Remote - United States")),
            (true, Some("UNITED".to_string()))
        );
        assert_eq!(extract_remote_info(Some("Hybrid - Austin, TX")), (true, None));
        assert_eq!(extract_remote_info(Some("Work from Home")), (true, None));
    }
}
