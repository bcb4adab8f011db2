use uuid::Uuid;

use crate::consts::APP_ID_PREFIX;

const ADJECTIVES: &[&str] = &[
  "amber", "bold", "brave", "bright", "calm", "clever", "cosmic", "crisp", "dapper", "eager", "fancy", "gentle",
  "golden", "grand", "happy", "humble", "jolly", "keen", "lively", "lucky", "mellow", "merry", "misty", "nimble",
  "noble", "proud", "quiet", "rapid", "rustic", "shiny", "silent", "swift",
];

const COLORS: &[&str] = &[
  "azure", "black", "blue", "bronze", "coral", "crimson", "cyan", "emerald", "green", "indigo", "ivory", "jade",
  "lemon", "lilac", "magenta", "maroon", "mint", "navy", "ochre", "olive", "orange", "pearl", "pink", "plum",
  "purple", "red", "rose", "ruby", "silver", "teal", "violet", "white",
];

const NOUNS: &[&str] = &[
  "badger", "beacon", "brook", "canyon", "cedar", "comet", "condor", "dolphin", "falcon", "fern", "fox", "glacier",
  "harbor", "heron", "island", "lantern", "maple", "meadow", "otter", "owl", "panda", "pebble", "pine", "raven",
  "river", "robin", "sparrow", "summit", "tiger", "tulip", "walrus", "willow",
];

/// Generate a readable, practically unique application id such as
/// `local.elmdesktop.brave-azure-otter-3f9a`.
pub fn generate_app_id() -> String {
  let bytes = Uuid::new_v4().into_bytes();
  let pick = |list: &[&'static str], byte: u8| list[byte as usize % list.len()];

  format!(
    "{}.{}-{}-{}-{:02x}{:02x}",
    APP_ID_PREFIX,
    pick(ADJECTIVES, bytes[0]),
    pick(COLORS, bytes[1]),
    pick(NOUNS, bytes[2]),
    bytes[3],
    bytes[4]
  )
}
