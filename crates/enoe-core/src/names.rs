//! Entity-name reconciliation.
//!
//! Three naming regimes meet here: the boundary file's shape names
//! (`Coahuila de Zaragoza`), the survey's legacy unaccented names
//! (`Michoacan`), and survey names whose accents were mangled on the way
//! through some export (`Michoac\u{FFFD}n`, `MichoacÃ¡n`). [`ALIASES`] maps
//! every known surface form to the canonical accented name; [`normalize_key`]
//! produces the fuzzy key used for everything the table does not list.

use unicode_normalization::{UnicodeNormalization, char::is_combining_mark};

/// Known surface form → canonical entity name.
pub static ALIASES: &[(&str, &str)] = &[
  // Boundary-file shape names.
  ("Aguascalientes", "Aguascalientes"),
  ("Baja California", "Baja California"),
  ("Baja California Sur", "Baja California Sur"),
  ("Campeche", "Campeche"),
  ("Chiapas", "Chiapas"),
  ("Chihuahua", "Chihuahua"),
  ("Coahuila de Zaragoza", "Coahuila"),
  ("Colima", "Colima"),
  ("Distrito Federal", "Ciudad de México"),
  ("Durango", "Durango"),
  ("Guanajuato", "Guanajuato"),
  ("Guerrero", "Guerrero"),
  ("Hidalgo", "Hidalgo"),
  ("Jalisco", "Jalisco"),
  ("Mexico", "México"),
  ("Michoacan de Ocampo", "Michoacán"),
  ("Morelos", "Morelos"),
  ("Nayarit", "Nayarit"),
  ("Nuevo Leon", "Nuevo León"),
  ("Oaxaca", "Oaxaca"),
  ("Puebla", "Puebla"),
  ("Queretaro de Arteaga", "Querétaro"),
  ("Quintana Roo", "Quintana Roo"),
  ("San Luis Potosi", "San Luis Potosí"),
  ("Sinaloa", "Sinaloa"),
  ("Sonora", "Sonora"),
  ("Tabasco", "Tabasco"),
  ("Tamaulipas", "Tamaulipas"),
  ("Tlaxcala", "Tlaxcala"),
  ("Veracruz de Ignacio de la Llave", "Veracruz"),
  ("Yucatan", "Yucatán"),
  ("Zacatecas", "Zacatecas"),
  // Legacy survey spellings.
  ("Ciudad de Mexico", "Ciudad de México"),
  ("Estado de Mexico", "México"),
  ("Estado de México", "México"),
  ("Michoacan", "Michoacán"),
  ("Michoacán de Ocampo", "Michoacán"),
  ("Queretaro", "Querétaro"),
  ("Querétaro de Arteaga", "Querétaro"),
  // Replacement-character exports.
  ("M\u{FFFD}xico", "México"),
  ("Ciudad de M\u{FFFD}xico", "Ciudad de México"),
  ("Michoac\u{FFFD}n", "Michoacán"),
  ("Nuevo Le\u{FFFD}n", "Nuevo León"),
  ("Quer\u{FFFD}taro", "Querétaro"),
  ("San Luis Potos\u{FFFD}", "San Luis Potosí"),
  ("Yucat\u{FFFD}n", "Yucatán"),
  // UTF-8 read as Latin-1.
  ("MÃ©xico", "México"),
  ("Ciudad de MÃ©xico", "Ciudad de México"),
  ("MichoacÃ¡n", "Michoacán"),
  ("Nuevo LeÃ³n", "Nuevo León"),
  ("QuerÃ©taro", "Querétaro"),
  ("San Luis PotosÃ\u{AD}", "San Luis Potosí"),
  ("YucatÃ¡n", "Yucatán"),
];

/// Exact lookup of a surface form in [`ALIASES`].
pub fn resolve_alias(raw: &str) -> Option<&'static str> {
  ALIASES
    .iter()
    .find(|(alias, _)| *alias == raw)
    .map(|(_, canonical)| *canonical)
}

/// The canonical spelling of `raw` if the alias table knows it, otherwise
/// `raw` unchanged.
pub fn canonical_name(raw: &str) -> &str { resolve_alias(raw).unwrap_or(raw) }

/// Fuzzy matching key: lowercase, strip diacritics, keep only alphanumeric
/// and whitespace characters, collapse whitespace runs to single spaces.
///
/// Idempotent: `normalize_key(&normalize_key(s)) == normalize_key(s)`.
pub fn normalize_key(raw: &str) -> String {
  let folded: String = raw
    .to_lowercase()
    .nfd()
    .filter(|c| !is_combining_mark(*c))
    .filter(|c| c.is_alphanumeric() || c.is_whitespace())
    .collect();
  folded.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// [`normalize_key`] for a name that may be absent. `None` is the empty key.
pub fn normalize_key_opt(raw: Option<&str>) -> String {
  raw.map(normalize_key).unwrap_or_default()
}
