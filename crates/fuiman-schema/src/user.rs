//! Column table for FOLIO `mod-user-import` files.

use crate::column::{ColumnRule, FormatRule};
use crate::group::ConditionalGroup;
use crate::SchemaDefinition;

/// Prefix of the personal information columns.
pub const PERSONAL_PREFIX: &str = "personal";
/// Prefix of the request preference columns.
pub const REQUEST_PREFERENCE_PREFIX: &str = "requestPreference";
/// Address column prefixes, paired with the `primaryAddress` flag they map to.
pub const ADDRESS_PREFIXES: [(&str, bool); 2] = [
    ("personal_address_primary", true),
    ("personal_address_secondary", false),
];

/// Delimiter for list cells.
pub const LIST_DELIMITER: char = ';';

pub const USER_TYPES: &[&str] = &["Patron", "Staff"];
pub const PREFERRED_CONTACT_TYPES: &[&str] = &["mail", "email", "text", "phone", "mobile"];
pub const EMAIL_COMMUNICATION: &[&str] = &["Support", "Programs", "Services"];
pub const FULFILLMENT: &[&str] = &["Delivery", "Hold Shelf"];

/// Columns that older import files carry but FOLIO no longer accepts.
pub const DEPRECATED_COLUMNS: &[&str] = &["proxyFor", "createdDate", "updatedDate", "meta"];

const COLUMNS: &[ColumnRule] = &[
    // Top level
    ColumnRule::string("username").required().unique(),
    ColumnRule::string("externalSystemId").required().unique(),
    ColumnRule::string("id").format(FormatRule::Uuid),
    ColumnRule::string("barcode").unique(),
    ColumnRule::boolean("active"),
    ColumnRule::string("type").format(FormatRule::OneOf(USER_TYPES)),
    ColumnRule::string("patronGroup"),
    ColumnRule::datetime("enrollmentDate"),
    ColumnRule::datetime("expirationDate"),
    ColumnRule::list("departments").unique_items(),
    ColumnRule::list("preferredEmailCommunication")
        .unique_items()
        .format(FormatRule::OneOf(EMAIL_COMMUNICATION)),
    ColumnRule::structured("customFields"),
    // Personal
    ColumnRule::string("personal_lastName"),
    ColumnRule::string("personal_firstName"),
    ColumnRule::string("personal_middleName"),
    ColumnRule::string("personal_preferredFirstName"),
    ColumnRule::string("personal_pronouns"),
    ColumnRule::string("personal_email").format(FormatRule::Email),
    ColumnRule::string("personal_phone"),
    ColumnRule::string("personal_mobilePhone"),
    ColumnRule::datetime("personal_dateOfBirth"),
    ColumnRule::string("personal_preferredContactTypeId")
        .format(FormatRule::OneOf(PREFERRED_CONTACT_TYPES)),
    ColumnRule::string("personal_profilePictureLink").format(FormatRule::Url),
    // Addresses
    ColumnRule::string("personal_address_primary_countryId"),
    ColumnRule::string("personal_address_primary_addressLine1"),
    ColumnRule::string("personal_address_primary_addressLine2"),
    ColumnRule::string("personal_address_primary_city"),
    ColumnRule::string("personal_address_primary_region"),
    ColumnRule::string("personal_address_primary_postalCode"),
    ColumnRule::string("personal_address_primary_addressTypeId"),
    ColumnRule::string("personal_address_secondary_countryId"),
    ColumnRule::string("personal_address_secondary_addressLine1"),
    ColumnRule::string("personal_address_secondary_addressLine2"),
    ColumnRule::string("personal_address_secondary_city"),
    ColumnRule::string("personal_address_secondary_region"),
    ColumnRule::string("personal_address_secondary_postalCode"),
    ColumnRule::string("personal_address_secondary_addressTypeId"),
    // Request preference
    ColumnRule::string("requestPreference_id").format(FormatRule::Uuid),
    ColumnRule::boolean("requestPreference_holdShelf"),
    ColumnRule::boolean("requestPreference_delivery"),
    ColumnRule::string("requestPreference_defaultServicePointId"),
    ColumnRule::string("requestPreference_defaultDeliveryAddressTypeId"),
    ColumnRule::string("requestPreference_fulfillment").format(FormatRule::OneOf(FULFILLMENT)),
];

// Address groups come before `personal` so that their issues are reported
// against the most specific prefix first.
const GROUPS: &[ConditionalGroup] = &[
    ConditionalGroup {
        prefix: "personal_address_primary",
        anchors: &["addressTypeId"],
    },
    ConditionalGroup {
        prefix: "personal_address_secondary",
        anchors: &["addressTypeId"],
    },
    ConditionalGroup {
        prefix: PERSONAL_PREFIX,
        anchors: &["lastName"],
    },
    ConditionalGroup {
        prefix: REQUEST_PREFERENCE_PREFIX,
        anchors: &["holdShelf", "delivery"],
    },
];

/// Schema of a FOLIO user import file.
pub const USER_IMPORT_SCHEMA: SchemaDefinition = SchemaDefinition {
    name: "user-import",
    columns: COLUMNS,
    groups: GROUPS,
    deprecated: DEPRECATED_COLUMNS,
    list_delimiter: LIST_DELIMITER,
};
