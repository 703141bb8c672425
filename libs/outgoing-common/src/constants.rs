//! Constants for the outgoing correspondence catalogue

/// Placeholder stored instead of an empty or whitespace-only field
pub const MISSING_VALUE: &str = "Daten fehlen";

/// Column label of the reference code
pub const LABEL_REFERENCE_CODE: &str = "Signatur";

/// Column label of the title
pub const LABEL_TITLE: &str = "Titel";

/// Column label of the scope and content description
pub const LABEL_SCOPE_AND_CONTENT: &str = "Form und Inhalt";

/// Column label of the date expression
pub const LABEL_DATE: &str = "Entstehungszeitraum";

/// Column label of the notes on the date
pub const LABEL_NOTES_ON_DATE: &str = "Bemerkungen zur Datierung";

/// Column label of the physical extent
pub const LABEL_EXTENT: &str = "Bemerkungen zum Umfang";

/// Column label of the language
pub const LABEL_LANGUAGE: &str = "Sprachen";

/// Column label of the numeric identifier
pub const LABEL_ID: &str = "ID";

/// Column labels in the order they appear in the stored table
pub const FIELD_LABELS: [&str; 8] = [
    LABEL_REFERENCE_CODE,
    LABEL_TITLE,
    LABEL_SCOPE_AND_CONTENT,
    LABEL_DATE,
    LABEL_NOTES_ON_DATE,
    LABEL_EXTENT,
    LABEL_LANGUAGE,
    LABEL_ID,
];

/// Author's date of birth (year, month, day)
pub const LIFESPAN_START: (i32, u32, u32) = (1875, 6, 6);

/// Author's date of death (year, month, day)
pub const LIFESPAN_END: (i32, u32, u32) = (1955, 8, 12);

/// Marker in front of an approximate date expression
pub const APPROXIMATE_MARKER: &str = "ca.";

/// Default table file name
pub const DEFAULT_TABLE_FILE: &str = "outgoing.csv";

/// Field delimiter of the stored table
pub const DEFAULT_DELIMITER: u8 = b';';

/// Text encoding of the stored table
pub const DEFAULT_ENCODING: &str = "latin1";

/// Locale whose language display names are accepted
pub const DEFAULT_LOCALE: &str = "de";

/// Default bind address of the HTTP service
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default port of the HTTP service
pub const DEFAULT_PORT: u16 = 5000;

/// Display format used for dates in messages
pub const DISPLAY_DATE_FORMAT: &str = "%d.%m.%Y";
