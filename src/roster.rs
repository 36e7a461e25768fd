use crate::error::AppError;
use once_cell::sync::Lazy;
use std::collections::HashMap;

pub type HeroId = u8;

pub const MIN_HERO_ID: HeroId = 1;
pub const MAX_HERO_ID: HeroId = 128;
pub const HERO_COUNT: usize = MAX_HERO_ID as usize;

const HEROES: [(HeroId, &str); HERO_COUNT] = [
    (1, "Miya"), (2, "Balmond"), (3, "Saber"), (4, "Alice"), (5, "Nana"),
    (6, "Tigreal"), (7, "Alucard"), (8, "Karina"), (9, "Akai"), (10, "Franco"),
    (11, "Bane"), (12, "Bruno"), (13, "Clint"), (14, "Rafaela"), (15, "Eudora"),
    (16, "Zilong"), (17, "Fanny"), (18, "Layla"), (19, "Minotaur"), (20, "Lolita"),
    (21, "Hayabusa"), (22, "Freya"), (23, "Gord"), (24, "Natalia"), (25, "Kagura"),
    (26, "Chou"), (27, "Sun"), (28, "Alpha"), (29, "Ruby"), (30, "YSS"),
    (31, "Moskov"), (32, "Johnson"), (33, "Cyclops"), (34, "Estes"), (35, "Hilda"),
    (36, "Aurora"), (37, "Lapu-Lapu"), (38, "Vexana"), (39, "Roger"), (40, "Karrie"),
    (41, "Gatotkaca"), (42, "Harley"), (43, "Irithel"), (44, "Grock"), (45, "Argus"),
    (46, "Odette"), (47, "Lancelot"), (48, "Diggie"), (49, "Hylos"), (50, "Zhask"),
    (51, "Helcurt"), (52, "Pharsa"), (53, "Lesley"), (54, "Jawhead"), (55, "Angela"),
    (56, "Gusion"), (57, "Valir"), (58, "Martis"), (59, "Uranus"), (60, "Hanabi"),
    (61, "Chang'e"), (62, "Kaja"), (63, "Selena"), (64, "Aldous"), (65, "Claude"),
    (66, "Vale"), (67, "Leomord"), (68, "Lunox"), (69, "Hanzo"), (70, "Belerick"),
    (71, "Kimmy"), (72, "Thamuz"), (73, "Harith"), (74, "Minsitthar"), (75, "Kadita"),
    (76, "Faramis"), (77, "Badang"), (78, "Khufra"), (79, "Granger"), (80, "Guinevere"),
    (81, "Esmeralda"), (82, "Terizla"), (83, "XBorg"), (84, "Ling"), (85, "Dyrroth"),
    (86, "Lylia"), (87, "Baxia"), (88, "Masha"), (89, "Wanwan"), (90, "Silvanna"),
    (91, "Cecilion"), (92, "Carmilla"), (93, "Atlas"), (94, "Popol and Kupa"), (95, "Yu Zhong"),
    (96, "Luo Yi"), (97, "Benedetta"), (98, "Khaleed"), (99, "Barats"), (100, "Brody"),
    (101, "Yve"), (102, "Mathilda"), (103, "Paquito"), (104, "Gloo"), (105, "Beatrix"),
    (106, "Phoveus"), (107, "Natan"), (108, "Aulus"), (109, "Aamon"), (110, "Valentina"),
    (111, "Edith"), (112, "Floryn"), (113, "Yin"), (114, "Melissa"), (115, "Xavier"),
    (116, "Julian"), (117, "Fredrinn"), (118, "Joy"), (119, "Novaria"), (120, "Arlott"),
    (121, "Ixia"), (122, "Nolan"), (123, "Cici"), (124, "Chip"), (125, "Zhuxin"),
    (126, "Suyou"), (127, "Lukas"), (128, "Kalea"),
];

// Alternate spellings seen in community data and reports
const ALIASES: [(&str, HeroId); 1] = [("Yi Sun-shin", 30)];

static NAME_INDEX: Lazy<HashMap<String, HeroId>> = Lazy::new(|| {
    HEROES
        .iter()
        .map(|&(id, name)| (normalize(name), id))
        .chain(ALIASES.iter().map(|&(name, id)| (normalize(name), id)))
        .collect()
});

/// Lower-cases and drops everything that is not a letter or digit, so
/// "Chang'e", "change" and "CHANG E" share one key.
pub fn normalize(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

pub fn is_valid_id(id: HeroId) -> bool {
    (MIN_HERO_ID..=MAX_HERO_ID).contains(&id)
}

pub fn all_ids() -> impl Iterator<Item = HeroId> {
    MIN_HERO_ID..=MAX_HERO_ID
}

/// Canonical name for `id`, or the id itself when it is not on the roster.
pub fn id_to_name(id: HeroId) -> String {
    if is_valid_id(id) {
        HEROES[(id - MIN_HERO_ID) as usize].1.to_string()
    } else {
        id.to_string()
    }
}

pub fn name_to_id(raw: &str) -> Option<HeroId> {
    let key = normalize(raw);
    if key.is_empty() {
        return None;
    }
    NAME_INDEX.get(&key).copied()
}

/// Resolves a single user token: all-digit tokens are ids, anything else a name.
pub fn resolve_token(token: &str) -> Result<HeroId, AppError> {
    let token = token.trim();
    if !token.is_empty() && token.chars().all(|c| c.is_ascii_digit()) {
        return token
            .parse::<HeroId>()
            .ok()
            .filter(|id| is_valid_id(*id))
            .ok_or_else(|| AppError::UnrecognizedHero(token.to_string()));
    }

    name_to_id(token).ok_or_else(|| AppError::UnrecognizedHero(token.to_string()))
}

/// Parses a comma-separated list of names and/or ids. Blank items are skipped
/// and the first unknown token aborts the whole list.
pub fn parse_hero_list(arg: &str) -> Result<Vec<HeroId>, AppError> {
    arg.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(resolve_token)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_table_is_dense_and_ordered() {
        for (idx, (id, _)) in HEROES.iter().enumerate() {
            assert_eq!(*id as usize, idx + 1);
        }
    }

    #[test]
    fn test_normalized_names_are_unique() {
        let keys: std::collections::HashSet<_> =
            HEROES.iter().map(|(_, name)| normalize(name)).collect();
        assert_eq!(keys.len(), HERO_COUNT);
    }

    #[test]
    fn test_name_variants_resolve() {
        assert_eq!(name_to_id("Chang'e"), Some(61));
        assert_eq!(name_to_id("change"), Some(61));
        assert_eq!(name_to_id("CHANG E"), Some(61));
        assert_eq!(name_to_id("popol and kupa"), Some(94));
        assert_eq!(name_to_id("PopolAndKupa"), Some(94));
        assert_eq!(name_to_id("lapulapu"), Some(37));
        assert_eq!(name_to_id("X.Borg"), Some(83));
        assert_eq!(name_to_id("Yi Sun-shin"), Some(30));
        assert_eq!(name_to_id("nobody"), None);
        assert_eq!(name_to_id("   "), None);
    }

    #[test]
    fn test_unknown_id_falls_back_to_number() {
        assert_eq!(id_to_name(0), "0");
        assert_eq!(id_to_name(200), "200");
        assert_eq!(id_to_name(128), "Kalea");
    }

    #[test]
    fn test_resolve_token() {
        assert_eq!(resolve_token("5").unwrap(), 5);
        assert_eq!(resolve_token(" nana ").unwrap(), 5);
        assert!(matches!(resolve_token("0"), Err(AppError::UnrecognizedHero(_))));
        assert!(matches!(resolve_token("129"), Err(AppError::UnrecognizedHero(_))));
        assert!(matches!(resolve_token("999"), Err(AppError::UnrecognizedHero(_))));
        assert!(matches!(resolve_token("Gandalf"), Err(AppError::UnrecognizedHero(t)) if t == "Gandalf"));
    }

    #[test]
    fn test_parse_hero_list() {
        assert_eq!(parse_hero_list("Miya, 2,,yu zhong ").unwrap(), vec![1, 2, 95]);
        assert!(parse_hero_list("").unwrap().is_empty());
        assert!(matches!(
            parse_hero_list("Miya,Sauron,Nana"),
            Err(AppError::UnrecognizedHero(t)) if t == "Sauron"
        ));
    }

    proptest! {
        #[test]
        fn prop_name_round_trips(id in MIN_HERO_ID..=MAX_HERO_ID) {
            prop_assert_eq!(name_to_id(&id_to_name(id)), Some(id));
            prop_assert_eq!(resolve_token(&id.to_string()).unwrap(), id);
        }
    }
}
