/// Catalog column names
pub const COL_UNIQUE_ID: &str = "Unique_ID";
pub const COL_ORIGIN: &str = "Origin";
pub const COL_ORIGINAL_FILE_NAME: &str = "Original_File_Name";
pub const COL_NEW_FILE_NAME: &str = "New_File_Name";
pub const COL_X_COORD: &str = "X_coord";
pub const COL_Y_COORD: &str = "Y_coord";

/// Columns every catalog carries after loading, in the order they are synthesised
pub const REQUIRED_COLUMNS: [&str; 6] = [
    COL_UNIQUE_ID,
    COL_ORIGIN,
    COL_ORIGINAL_FILE_NAME,
    COL_NEW_FILE_NAME,
    COL_X_COORD,
    COL_Y_COORD,
];

/// Audit log columns
pub const AUDIT_COLUMNS_RENAMED: [&str; 5] =
    ["timestamp", "original_name", "new_name", "success", "message"];
pub const AUDIT_COLUMNS_SAME_NAME: [&str; 4] = ["timestamp", "original_name", "success", "message"];

/// Photo point output columns
pub const POINT_COLUMNS: [&str; 7] = ["FolderID", "Path", "Name", "X", "Y", "DateTime", "Direction"];
pub const INVALID_PHOTO_COLUMNS: [&str; 3] = ["Path", "Name", "Reason"];

/// EXIF seconds are stored as a rational over this denominator (1/100 s)
pub const SECONDS_DENOMINATOR: u32 = 100;

/// Geographic bounds
pub const MIN_LAT: f64 = -90.0;
pub const MAX_LAT: f64 = 90.0;
pub const MIN_LON: f64 = -180.0;
pub const MAX_LON: f64 = 180.0;

/// Image discovery defaults
pub const DEFAULT_IMAGE_EXTENSIONS: [&str; 2] = ["jpg", "jpeg"];
pub const RENAMED_EXTENSION: &str = ".jpg";

/// Output file prefixes
pub const COMPLETED_CATALOG_PREFIX: &str = "Database_import_EXIF_completed";
pub const UNREFERENCED_CATALOG_PREFIX: &str = "Consider_Include";
pub const AUDIT_LOG_PREFIX: &str = "logger";
pub const POINTS_PREFIX: &str = "photo_points";
pub const INVALID_PHOTOS_PREFIX: &str = "invalid_photos";

/// Timestamp format used in output file names
pub const FILE_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Default configuration file looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "geophoto.toml";
pub const ENV_PREFIX: &str = "GEOPHOTO";

/// Catalog encodings
pub const ENCODING_UTF8: &str = "utf-8";
pub const ENCODING_LATIN1: &str = "latin1";
