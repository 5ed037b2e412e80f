//! Fake personal and company data drawn from small embedded word lists.

use rand::seq::SliceRandom;
use rand::{Rng, RngCore};

const FIRST_NAMES: &[&str] = &[
    "James", "Naomi", "Amos", "Alex", "Chrisjen", "Roberta", "Julie", "Camina", "Klaes", "Marco",
    "Elvi", "Fred", "Anderson", "Sadavir", "Clarissa", "Jules", "Monica", "Filip", "Holden",
    "Teresa", "Winston", "Adele", "Samara", "Oscar", "Lucia", "Jeromy", "Beatrice", "Hugo",
    "Ingrid", "Tobias",
];

const LAST_NAMES: &[&str] = &[
    "Holden", "Nagata", "Burton", "Kamal", "Avasarala", "Draper", "Mao", "Drummer", "Ashford",
    "Inaros", "Okoye", "Johnson", "Dawes", "Errinwright", "Stuart", "Anderson", "Schmeler",
    "Ziemann", "Kowalski", "Lindqvist", "Moreau", "Okafor", "Tanaka", "Fischer", "Romero",
    "Haddad", "Novak", "Castillo", "Brennan", "Duarte",
];

const STREETS: &[&str] = &[
    "Harbor", "Maple", "Ceres", "Tycho", "Eros", "Ganymede", "Lakeview", "Sunset", "Orchard",
    "Granite", "Willow", "Ridge", "Station", "Mill", "Pine",
];

const STREET_SUFFIXES: &[&str] = &[
    "Street", "Avenue", "Road", "Lane", "Boulevard", "Way", "Court", "Drive", "Place",
];

const CITIES: &[&str] = &[
    "Chula Vista", "Springfield", "Riverside", "Fairview", "Georgetown", "Madison", "Franklin",
    "Clinton", "Arlington", "Ashland", "Salem", "Dover", "Oxford", "Burlington", "Milton",
];

const STATES: &[&str] = &[
    "New Hampshire", "Oregon", "Vermont", "Texas", "Ohio", "Nevada", "Maine", "Iowa", "Utah",
    "Idaho", "Montana", "Kansas", "Georgia", "Colorado", "Alaska",
];

const COUNTRIES: &[&str] = &[
    "Mali", "Argentina", "Canada", "Portugal", "Japan", "Kenya", "Norway", "Chile", "Vietnam",
    "Estonia", "Morocco", "Uruguay", "Finland", "Peru", "Ghana",
];

const COMPANY_WORDS: &[&str] = &[
    "Gov", "Tribe", "Proto", "Mogul", "Tycho", "Pinwheel", "Blue", "Rocinante", "Quantum",
    "Stellar", "Iron", "Beacon", "Summit", "Vertex", "Harbor", "Copper", "Atlas", "Nimbus",
];

const COMPANY_SUFFIXES: &[&str] = &["Inc", "LLC", "Group", "Labs", "Corp", "Systems", "Partners"];

const EMAIL_DOMAINS: &[&str] = &[
    "ziemann", "example", "mailbox", "inbox", "postal", "belter", "orbital", "courier",
];

const TOP_LEVEL_DOMAINS: &[&str] = &["com", "net", "org", "biz", "io", "info"];

const LETTERS: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

fn pick(rng: &mut dyn RngCore, words: &'static [&'static str]) -> &'static str {
    words.choose(rng).copied().unwrap_or_default()
}

pub(super) fn letters(rng: &mut dyn RngCore, len: usize) -> String {
    (0..len)
        .map(|_| LETTERS[rng.gen_range(0..LETTERS.len())] as char)
        .collect()
}

fn digits(rng: &mut dyn RngCore, len: usize) -> String {
    (0..len)
        .map(|_| char::from(b'0' + rng.gen_range(0..10u8)))
        .collect()
}

pub(super) fn full_name(rng: &mut dyn RngCore) -> String {
    format!("{} {}", pick(rng, FIRST_NAMES), pick(rng, LAST_NAMES))
}

pub(super) fn email(rng: &mut dyn RngCore) -> String {
    let first = pick(rng, FIRST_NAMES);
    let last = pick(rng, LAST_NAMES);
    let domain = pick(rng, EMAIL_DOMAINS);
    let tld = pick(rng, TOP_LEVEL_DOMAINS);
    format!("{first}{last}@{domain}.{tld}").to_lowercase()
}

pub(super) fn phone(rng: &mut dyn RngCore) -> String {
    // A leading zero reads oddly in most numbering plans.
    let lead = char::from(b'1' + rng.gen_range(0..9u8));
    format!("{lead}{}", digits(rng, 9))
}

pub(super) fn address(rng: &mut dyn RngCore) -> String {
    let number = rng.gen_range(1..10_000u32);
    let street = pick(rng, STREETS);
    let suffix = pick(rng, STREET_SUFFIXES);
    let city = pick(rng, CITIES);
    let state = pick(rng, STATES);
    let zip = digits(rng, 5);
    let country = pick(rng, COUNTRIES);
    format!("{number} {street} {suffix}, {city}, {state}, {zip}, {country}")
}

pub(super) fn company(rng: &mut dyn RngCore) -> String {
    let first = pick(rng, COMPANY_WORDS);
    let second = pick(rng, COMPANY_WORDS);
    if rng.gen_bool(0.5) {
        format!("{first}{second}")
    } else {
        format!("{first}{} {}", second.to_lowercase(), pick(rng, COMPANY_SUFFIXES))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256StarStar;

    #[test]
    fn name_has_first_and_last() {
        let mut rng = Xoshiro256StarStar::seed_from_u64(7);
        let name = full_name(&mut rng);
        let parts: Vec<&str> = name.split(' ').collect();
        assert_eq!(parts.len(), 2);
        assert!(FIRST_NAMES.contains(&parts[0]));
        assert!(LAST_NAMES.contains(&parts[1]));
    }

    #[test]
    fn email_is_lower_case_with_one_at() {
        let mut rng = Xoshiro256StarStar::seed_from_u64(7);
        let email = email(&mut rng);
        assert_eq!(email, email.to_lowercase());
        assert_eq!(email.matches('@').count(), 1);
        assert!(email.rsplit('.').next().is_some_and(|tld| TOP_LEVEL_DOMAINS.contains(&tld)));
    }

    #[test]
    fn phone_is_ten_digits() {
        let mut rng = Xoshiro256StarStar::seed_from_u64(7);
        for _ in 0..20 {
            let phone = phone(&mut rng);
            assert_eq!(phone.len(), 10);
            assert!(phone.chars().all(|c| c.is_ascii_digit()));
            assert!(!phone.starts_with('0'));
        }
    }

    #[test]
    fn address_is_one_line_with_five_parts() {
        let mut rng = Xoshiro256StarStar::seed_from_u64(7);
        let address = address(&mut rng);
        assert!(!address.contains('\n'));
        assert_eq!(address.split(", ").count(), 5);
    }
}
