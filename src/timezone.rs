//! Tenant timezone resolution and slot parsing. Mirrors `timezone_utils.py`:
//! every tenant's "now" is computed in its own IANA zone, and CRM slot
//! strings are parsed with or without an explicit offset depending on shape.

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;

pub const DEFAULT_TZ: &str = "Europe/Moscow";
pub const SLOT_FORMAT_NO_TZ: &str = "%Y-%m-%d %H:%M";

/// `MCP_TZ_<UPPER(tenant)>`, defaulting to [`DEFAULT_TZ`].
pub fn tz_name_for_tenant(tenant: &str) -> String {
    let key = format!("MCP_TZ_{}", tenant.to_uppercase());
    std::env::var(key).unwrap_or_else(|_| DEFAULT_TZ.to_string())
}

pub fn tz_for_tenant(tenant: &str) -> Tz {
    let name = tz_name_for_tenant(tenant);
    name.parse().unwrap_or(chrono_tz::Europe::Moscow)
}

pub fn now_local(tenant: &str) -> DateTime<Tz> {
    Utc::now().with_timezone(&tz_for_tenant(tenant))
}

#[derive(Debug, thiserror::Error)]
#[error("could not parse slot string: {0:?}")]
pub struct SlotParseError(pub String);

/// Honor an explicit offset if the slot carries one (including trailing
/// `Z`); otherwise parse as a naive local time and attach the tenant's zone.
/// This is the only place in the crate allowed to manufacture a timezone.
pub fn parse_slot(tenant: &str, slot: &str) -> Result<DateTime<Tz>, SlotParseError> {
    let normalized = slot.replace('Z', "+00:00");

    if let Ok(parsed) = DateTime::parse_from_rfc3339(&normalized) {
        return Ok(parsed.with_timezone(&tz_for_tenant(tenant)));
    }

    let naive = NaiveDateTime::parse_from_str(slot, SLOT_FORMAT_NO_TZ)
        .map_err(|_| SlotParseError(slot.to_string()))?;
    tz_for_tenant(tenant)
        .from_local_datetime(&naive)
        .single()
        .ok_or_else(|| SlotParseError(slot.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    #[test]
    fn default_tz_is_moscow() {
        std::env::remove_var("MCP_TZ_SOFIA");
        assert_eq!(tz_name_for_tenant("sofia"), "Europe/Moscow");
    }

    #[test]
    fn tenant_override_is_read_uppercased() {
        std::env::set_var("MCP_TZ_ALENA", "Asia/Tbilisi");
        assert_eq!(tz_name_for_tenant("alena"), "Asia/Tbilisi");
        std::env::remove_var("MCP_TZ_ALENA");
    }

    #[test]
    fn offset_aware_slot_keeps_its_own_instant_regardless_of_tenant_tz() {
        std::env::remove_var("MCP_TZ_SOFIA");
        let parsed_msk = parse_slot("sofia", "2030-01-15T10:00:00+03:00").unwrap();
        std::env::set_var("MCP_TZ_SOFIA", "Asia/Vladivostok");
        let parsed_vlad = parse_slot("sofia", "2030-01-15T10:00:00+03:00").unwrap();
        std::env::remove_var("MCP_TZ_SOFIA");
        assert_eq!(parsed_msk.with_timezone(&Utc), parsed_vlad.with_timezone(&Utc));
    }

    #[test]
    fn naive_slot_is_tagged_with_tenant_timezone() {
        std::env::set_var("MCP_TZ_SOFIA", "Europe/Moscow");
        let parsed = parse_slot("sofia", "2030-01-15 10:00").unwrap();
        assert_eq!(parsed.timezone(), chrono_tz::Europe::Moscow);
        std::env::remove_var("MCP_TZ_SOFIA");
    }

    #[test]
    fn z_suffixed_slot_parses_as_utc_offset() {
        let parsed = parse_slot("sofia", "2030-01-15T07:00:00Z").unwrap();
        assert_eq!(parsed.with_timezone(&Utc).hour(), 7);
    }
}
