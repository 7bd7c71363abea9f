// Country catalogue offered by the strategy search

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Country {
    pub name: &'static str,
    pub code: &'static str,
}

pub const COUNTRIES: &[Country] = &[
    Country { name: "Andorra", code: "ad" },
    Country { name: "United Arab Emirates", code: "ae" },
    Country { name: "Albania", code: "al" },
    Country { name: "Armenia", code: "am" },
    Country { name: "American Samoa", code: "as" },
    Country { name: "Austria", code: "at" },
    Country { name: "Azerbaijan", code: "az" },
    Country { name: "Bosnia and Herzegovina", code: "ba" },
    Country { name: "Belgium", code: "be" },
    Country { name: "Burkina Faso", code: "bf" },
    Country { name: "Bulgaria", code: "bg" },
    Country { name: "Burundi", code: "bi" },
    Country { name: "Benin", code: "bj" },
    Country { name: "Bahamas", code: "bs" },
    Country { name: "Bhutan", code: "bt" },
    Country { name: "Belarus", code: "by" },
    Country { name: "Canada", code: "ca" },
    Country { name: "Democratic Republic of the Congo", code: "cg" },
    Country { name: "Central African Republic", code: "cf" },
    Country { name: "Republic of the Congo", code: "cg" },
    Country { name: "Switzerland", code: "ch" },
    Country { name: "Ivory Coast", code: "ci" },
    Country { name: "Chile", code: "cl" },
    Country { name: "Cameroon", code: "cm" },
    Country { name: "Angola", code: "ao" },
    Country { name: "Botswana", code: "bw" },
    Country { name: "Cook Islands", code: "ck" },
    Country { name: "Costa Rica", code: "cr" },
    Country { name: "Indonesia", code: "id" },
    Country { name: "Israel", code: "il" },
    Country { name: "India", code: "in" },
    Country { name: "Japan", code: "jp" },
    Country { name: "Kenya", code: "ke" },
    Country { name: "South Korea", code: "kr" },
    Country { name: "Lesotho", code: "ls" },
    Country { name: "Morocco", code: "ma" },
    Country { name: "Mozambique", code: "mz" },
    Country { name: "New Zealand", code: "nz" },
    Country { name: "Thailand", code: "th" },
    Country { name: "Tanzania", code: "tz" },
    Country { name: "Uganda", code: "ug" },
    Country { name: "United Kingdom", code: "uk" },
    Country { name: "Uzbekistan", code: "uz" },
    Country { name: "Venezuela", code: "ve" },
    Country { name: "United States Virgin Islands", code: "vi" },
    Country { name: "South Africa", code: "za" },
    Country { name: "Zambia", code: "zm" },
    Country { name: "Zimbabwe", code: "zw" },
    Country { name: "United States", code: "us" },
    Country { name: "Afghanistan", code: "af" },
    Country { name: "Antigua and Barbuda", code: "ag" },
    Country { name: "Anguilla", code: "ai" },
    Country { name: "Argentina", code: "ar" },
    Country { name: "Australia", code: "au" },
    Country { name: "Bangladesh", code: "bd" },
    Country { name: "Bahrain", code: "bh" },
    Country { name: "Brunei", code: "bn" },
    Country { name: "Bolivia", code: "bo" },
    Country { name: "Brazil", code: "br" },
    Country { name: "Belize", code: "bz" },
    Country { name: "Colombia", code: "co" },
    Country { name: "Cuba", code: "cu" },
    Country { name: "Cyprus", code: "cy" },
    Country { name: "Dominican Republic", code: "do" },
    Country { name: "Ecuador", code: "ec" },
    Country { name: "Egypt", code: "eg" },
    Country { name: "Ethiopia", code: "et" },
    Country { name: "Fiji", code: "fj" },
    Country { name: "Ghana", code: "gh" },
    Country { name: "Gibraltar", code: "gi" },
    Country { name: "Guatemala", code: "gt" },
    Country { name: "Hong Kong", code: "hk" },
    Country { name: "Jamaica", code: "jm" },
    Country { name: "Cambodia", code: "kh" },
    Country { name: "Kuwait", code: "kw" },
    Country { name: "Lebanon", code: "lb" },
    Country { name: "Libya", code: "ly" },
    Country { name: "Myanmar", code: "mm" },
    Country { name: "Malta", code: "mt" },
    Country { name: "Mexico", code: "mx" },
    Country { name: "Malaysia", code: "my" },
    Country { name: "Namibia", code: "na" },
    Country { name: "Nigeria", code: "ng" },
    Country { name: "Nicaragua", code: "ni" },
    Country { name: "Nepal", code: "np" },
    Country { name: "Oman", code: "om" },
    Country { name: "Panama", code: "pa" },
    Country { name: "Peru", code: "pe" },
    Country { name: "Papua New Guinea", code: "pg" },
    Country { name: "Philippines", code: "ph" },
    Country { name: "Pakistan", code: "pk" },
    Country { name: "Puerto Rico", code: "pr" },
    Country { name: "Paraguay", code: "py" },
    Country { name: "Qatar", code: "qa" },
    Country { name: "Saudi Arabia", code: "sa" },
    Country { name: "Solomon Islands", code: "sb" },
    Country { name: "Singapore", code: "sg" },
    Country { name: "Sierra Leone", code: "sl" },
    Country { name: "El Salvador", code: "sv" },
    Country { name: "Tajikistan", code: "tj" },
    Country { name: "Turkey", code: "tr" },
    Country { name: "Taiwan", code: "tw" },
    Country { name: "Ukraine", code: "ua" },
    Country { name: "Uruguay", code: "uy" },
    Country { name: "Saint Vincent and the Grenadines", code: "vc" },
    Country { name: "Vietnam", code: "vn" },
    Country { name: "Cape Verde", code: "cv" },
    Country { name: "Czech Republic", code: "cz" },
    Country { name: "Germany", code: "de" },
    Country { name: "Djibouti", code: "dj" },
    Country { name: "Denmark", code: "dk" },
    Country { name: "Dominica", code: "dm" },
    Country { name: "Algeria", code: "dz" },
    Country { name: "Estonia", code: "ee" },
    Country { name: "Spain", code: "es" },
    Country { name: "Finland", code: "fi" },
    Country { name: "Micronesia, Federated States of", code: "fm" },
    Country { name: "France", code: "fr" },
    Country { name: "Gabon", code: "ga" },
    Country { name: "Georgia", code: "ge" },
    Country { name: "Greenland", code: "gl" },
    Country { name: "Gambia", code: "gm" },
    Country { name: "Guadeloupe", code: "gp" },
    Country { name: "Greece", code: "gr" },
    Country { name: "Guyana", code: "gy" },
    Country { name: "Honduras", code: "hn" },
    Country { name: "Croatia", code: "hr" },
    Country { name: "Haiti", code: "ht" },
    Country { name: "Hungary", code: "hu" },
    Country { name: "Ireland", code: "ie" },
    Country { name: "Iraq", code: "iq" },
    Country { name: "Iceland", code: "is" },
    Country { name: "Italy", code: "it" },
    Country { name: "Jordan", code: "jo" },
    Country { name: "Kyrgyzstan", code: "kg" },
    Country { name: "Kiribati", code: "ki" },
    Country { name: "Kazakhstan", code: "kz" },
    Country { name: "Laos", code: "la" },
    Country { name: "Liechtenstein", code: "li" },
    Country { name: "Sri Lanka", code: "lk" },
    Country { name: "Lithuania", code: "lt" },
    Country { name: "Luxembourg", code: "lu" },
    Country { name: "Latvia", code: "lv" },
    Country { name: "Moldova", code: "md" },
    Country { name: "Madagascar", code: "mg" },
    Country { name: "Macedonia", code: "mk" },
    Country { name: "Mali", code: "ml" },
    Country { name: "Mongolia", code: "mn" },
    Country { name: "Montserrat", code: "ms" },
    Country { name: "Mauritius", code: "mu" },
    Country { name: "Maldives", code: "mv" },
    Country { name: "Malawi", code: "mw" },
    Country { name: "Niger", code: "ne" },
    Country { name: "Netherlands", code: "nl" },
    Country { name: "Norway", code: "no" },
    Country { name: "Nauru", code: "nr" },
    Country { name: "Niue", code: "nu" },
    Country { name: "Poland", code: "pl" },
    Country { name: "Palestine", code: "ps" },
    Country { name: "Portugal", code: "pt" },
    Country { name: "Romania", code: "ro" },
    Country { name: "Serbia", code: "rs" },
    Country { name: "Russia", code: "ru" },
    Country { name: "Rwanda", code: "rw" },
    Country { name: "Seychelles", code: "sc" },
    Country { name: "Sweden", code: "se" },
    Country { name: "Saint Helena, Ascension and Tristan da Cunha", code: "sh" },
    Country { name: "Slovenia", code: "si" },
    Country { name: "Slovakia", code: "sk" },
    Country { name: "San Marino", code: "sm" },
    Country { name: "Senegal", code: "sn" },
    Country { name: "Somalia", code: "so" },
    Country { name: "Suriname", code: "sr" },
    Country { name: "Chad", code: "td" },
    Country { name: "Togo", code: "tg" },
    Country { name: "Tokelau", code: "tk" },
    Country { name: "Timor-Leste", code: "tl" },
    Country { name: "Turkmenistan", code: "tm" },
    Country { name: "Tunisia", code: "tn" },
    Country { name: "Tonga", code: "to" },
    Country { name: "Trinidad and Tobago", code: "tt" },
    Country { name: "British Virgin Islands", code: "vg" },
    Country { name: "Vanuatu", code: "vu" },
    Country { name: "Samoa", code: "ws" },
];

/// Lookup by two-letter code, falling back to a case-insensitive name match.
///
/// A code shared by two entries resolves to the first one listed.
pub fn find(query: &str) -> Option<&'static Country> {
    let needle = query.trim();
    if needle.is_empty() {
        return None;
    }
    COUNTRIES
        .iter()
        .find(|c| c.code.eq_ignore_ascii_case(needle))
        .or_else(|| COUNTRIES.iter().find(|c| c.name.eq_ignore_ascii_case(needle)))
}

/// Entries whose name contains `filter`, case-insensitively.
pub fn search(filter: &str) -> Vec<&'static Country> {
    let needle = filter.trim().to_lowercase();
    COUNTRIES
        .iter()
        .filter(|c| needle.is_empty() || c.name.to_lowercase().contains(&needle))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_by_code_and_name() {
        assert_eq!(find("us").map(|c| c.name), Some("United States"));
        assert_eq!(find("UK").map(|c| c.name), Some("United Kingdom"));
        assert_eq!(find("new zealand").map(|c| c.code), Some("nz"));
        assert!(find("").is_none());
        assert!(find("atlantis").is_none());
    }

    #[test]
    fn test_shared_code_resolves_to_first() {
        assert_eq!(find("cg").map(|c| c.name), Some("Democratic Republic of the Congo"));
    }

    #[test]
    fn test_search() {
        let hits = search("congo");
        assert_eq!(hits.len(), 2);
        assert_eq!(search("").len(), COUNTRIES.len());
    }
}
