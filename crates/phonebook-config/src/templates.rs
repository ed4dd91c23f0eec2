//! Configuration template for `phonebook init`.

/// Default configuration (valid JSON).
const DEFAULT_TEMPLATE: &str = include_str!("../templates/ldap-phonebook.json");

/// Returns the default configuration file contents.
pub fn default_template() -> &'static str {
    DEFAULT_TEMPLATE
}
