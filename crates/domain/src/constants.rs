//! Application constants
//!
//! Centralized location for the defaults used when no configuration file or
//! environment override is present.

// Portal
pub const DEFAULT_LOGIN_URL: &str = concat!(
    "https://krowdweb.darden.com/krowd/prd/siteminder/login_aa.asp?TYPE=33554433",
    "&REALMOID=06-918f5c77-d475-4ec7-9360-482fef7e698b",
    "&GUID=",
    "&SMAUTHREASON=0",
    "&METHOD=GET",
    "&SMAGENTNAME=-SM-LOG13DUEImGuYrdflrOtZQg%2fn6D1bmWqj8asUhwZ%2fq0IFEFIKmOZdUnhd5D8fCuC",
    "&TARGET=-SM-https%3a%2f%2fkrowdweb%2edarden%2ecom",
    "%2faffiliates%2fkrowdext%2fkrowdextaccess%2easp",
);
pub const DEFAULT_SHIFTS_API_BASE: &str = "https://myshift.darden.com/api/v1/corporations/TOG";
pub const DEFAULT_PORTAL_REFERER: &str = "https://myshift.darden.com/ui/";
pub const DEFAULT_PORTAL_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:125.0) Gecko/20100101 Firefox/125.0";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

// Session cookies
pub const RESTAURANT_COOKIE: &str = "Rest";
pub const EMPLOYEE_COOKIE: &str = "EmpID";
pub const SESSION_TOKEN_COOKIE: &str = "SMSESSION";
pub const ESSENTIAL_COOKIES: [&str; 3] = [RESTAURANT_COOKIE, EMPLOYEE_COOKIE, SESSION_TOKEN_COOKIE];

// Browser login
pub const DEFAULT_CHROMEDRIVER_PATH: &str = "chromedriver";
pub const DEFAULT_WEBDRIVER_PORT: u16 = 9515;
pub const DEFAULT_LOGIN_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_SETTLE_DELAY_SECS: u64 = 3;
pub const DEFAULT_USERNAME_FIELD_ID: &str = "user";
pub const DEFAULT_PASSWORD_FIELD_ID: &str = "password";
pub const DEFAULT_SUBMIT_BUTTON_ID: &str = "btnLogin";

// Calendar
pub const DEFAULT_CALENDAR_LABEL: &str = "OG";
pub const DEFAULT_CALENDAR_API_BASE: &str = "https://www.googleapis.com/calendar/v3";
pub const DEFAULT_TOKEN_PATH: &str = "token.json";

// Managed event template
pub const DEFAULT_EVENT_SUMMARY: &str = "OG";
pub const DEFAULT_EVENT_LOCATION: &str = "24688 Hesperian Blvd, Hayward, CA 94545";
pub const DEFAULT_EVENT_DESCRIPTION: &str =
    "Lock In. Keep on grinding. What you put out is what you get back";
pub const DEFAULT_EVENT_TIMEZONE: &str = "America/Los_Angeles";

// Schedule storage
pub const DEFAULT_SCHEDULE_DIR: &str = "./data/schedules";

/// Date format used for query parameters and artifact names.
pub const DATE_FORMAT: &str = "%Y-%m-%d";
/// Local (zone-less) timestamp format used by the portal and calendar payloads.
pub const LOCAL_DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";
