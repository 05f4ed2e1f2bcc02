//! West and Central Africa (WCA) country table.
//!
//! The language grid spells countries in several ways; every accepted
//! spelling maps to one ISO 3166-1 alpha-2 code.

/// Accepted country spellings and their ISO 3166-1 alpha-2 codes.
const WCA_SPELLINGS: &[(&str, &str)] = &[
    ("Benin", "BJ"),
    ("Burkina Faso", "BF"),
    ("Cameroon", "CM"),
    ("Central African Republic", "CF"),
    ("Chad", "TD"),
    ("Republic of the Congo", "CG"),
    ("Congo", "CG"),
    ("Côte d'Ivoire", "CI"),
    ("Cote d'Ivoire", "CI"),
    ("Ivory Coast", "CI"),
    ("Democratic Republic of the Congo", "CD"),
    ("Democratic Republic of Congo", "CD"),
    ("DR Congo", "CD"),
    ("DRC", "CD"),
    ("Equatorial Guinea", "GQ"),
    ("Gabon", "GA"),
    ("The Gambia", "GM"),
    ("Gambia", "GM"),
    ("Ghana", "GH"),
    ("Guinea", "GN"),
    ("Guinea-Bissau", "GW"),
    ("Liberia", "LR"),
    ("Mali", "ML"),
    ("Mauritania", "MR"),
    ("Niger", "NE"),
    ("Nigeria", "NG"),
    ("Sao Tome and Principe", "ST"),
    ("São Tomé and Príncipe", "ST"),
    ("Senegal", "SN"),
    ("Sierra Leone", "SL"),
    ("Togo", "TG"),
];

/// Display names by code. The first 23 entries are the WCA region in display order.
const COUNTRY_NAMES: &[(&str, &str)] = &[
    ("BJ", "Benin"),
    ("BF", "Burkina Faso"),
    ("CM", "Cameroon"),
    ("CF", "Central African Republic"),
    ("TD", "Chad"),
    ("CG", "Republic of the Congo"),
    ("CI", "Côte d'Ivoire"),
    ("CD", "DR Congo"),
    ("GQ", "Equatorial Guinea"),
    ("GA", "Gabon"),
    ("GM", "The Gambia"),
    ("GH", "Ghana"),
    ("GN", "Guinea"),
    ("GW", "Guinea-Bissau"),
    ("LR", "Liberia"),
    ("ML", "Mali"),
    ("MR", "Mauritania"),
    ("NE", "Niger"),
    ("NG", "Nigeria"),
    ("ST", "São Tomé and Príncipe"),
    ("SN", "Senegal"),
    ("SL", "Sierra Leone"),
    ("TG", "Togo"),
    ("KE", "Kenya"),
    ("ZA", "South Africa"),
    ("ET", "Ethiopia"),
    ("TZ", "Tanzania"),
    ("UG", "Uganda"),
    ("RW", "Rwanda"),
    ("ZW", "Zimbabwe"),
    ("ZM", "Zambia"),
    ("MW", "Malawi"),
    ("MZ", "Mozambique"),
    ("AO", "Angola"),
    ("NA", "Namibia"),
    ("BW", "Botswana"),
    ("EG", "Egypt"),
    ("MA", "Morocco"),
    ("DZ", "Algeria"),
    ("TN", "Tunisia"),
    ("SD", "Sudan"),
    ("SS", "South Sudan"),
    ("SO", "Somalia"),
    ("MG", "Madagascar"),
    ("CV", "Cape Verde"),
];

const WCA_COUNT: usize = 23;

/// ISO code of a WCA country given any accepted spelling.
pub fn wca_code(name: &str) -> Option<&'static str> {
    let name = name.trim();
    WCA_SPELLINGS
        .iter()
        .find(|(spelling, _)| *spelling == name)
        .map(|(_, code)| *code)
}

pub fn is_wca_country(name: &str) -> bool {
    wca_code(name).is_some()
}

/// Display name for an ISO 3166 code, falling back to the code itself.
pub fn country_name(code: &str) -> &str {
    COUNTRY_NAMES
        .iter()
        .find(|(c, _)| c.eq_ignore_ascii_case(code))
        .map(|(_, name)| *name)
        .unwrap_or(code)
}

/// The WCA countries as (code, display name), in display order.
pub fn wca_countries() -> &'static [(&'static str, &'static str)] {
    &COUNTRY_NAMES[..WCA_COUNT]
}

/// Keep only the WCA countries of a list of country names.
pub fn filter_wca<'a>(countries: &'a [String]) -> Vec<&'a str> {
    countries
        .iter()
        .map(String::as_str)
        .filter(|c| is_wca_country(c))
        .collect()
}
