// Time server page: SNTP, daylight saving and manual clock.

use crate::cache::ConfigInvalidator;
use crate::error::Error;
use crate::session::Session;

use super::{FormEndpoint, flag};

const ENDPOINT: &str = "/delta/adm_time";

const SYSLOG_KEY: &str = "SysLog";

/// Time zones in the order of the page's `NTP_ZONE` drop-down.
pub const TIME_ZONES: [&str; 28] = [
    "GMT-12", "GMT-11", "GMT-10", "GMT-09", "GMT-08", "GMT-07", "GMT-06", "GMT-05", "GMT-04",
    "GMT-03:30", "GMT-03", "GMT-02", "GMT-01", "GMT", "GMT+01", "GMT+02", "GMT+03", "GMT+03:30",
    "GMT+04", "GMT+05", "GMT+05:30", "GMT+06", "GMT+07", "GMT+08", "GMT+09", "GMT+10", "GMT+11",
    "GMT+12",
];

/// Drop-down index of a zone name such as `GMT+05:30`.
pub fn zone_index(zone: &str) -> Result<usize, Error> {
    TIME_ZONES
        .iter()
        .position(|z| z.eq_ignore_ascii_case(zone))
        .ok_or_else(|| Error::invalid("time zone", zone, "expected GMT-12 .. GMT+12"))
}

pub struct TimeServer<'a> {
    form: FormEndpoint<'a>,
}

impl<'a> TimeServer<'a> {
    pub fn new(session: &'a Session) -> Self {
        Self {
            form: FormEndpoint::new(session, ENDPOINT),
        }
    }

    pub fn with_invalidator(session: &'a Session, invalidator: &'a dyn ConfigInvalidator) -> Self {
        Self {
            form: FormEndpoint::with_invalidator(session, invalidator, ENDPOINT),
        }
    }

    /// `NTP_MANU` is the manual-clock switch, so enabling SNTP clears it.
    pub async fn set_sntp_enabled(&self, enabled: bool) -> Result<(), Error> {
        self.form.submit(&[("NTP_MANU", flag(!enabled))]).await
    }

    /// Enable daylight saving between two `MM/DD` dates.
    pub async fn enable_daylight_saving(&self, start: &str, end: &str) -> Result<(), Error> {
        self.form
            .submit(&[
                ("NTP_MANU", "0"),
                ("NTP_DLS_EN", "1"),
                ("NTP_DLS_SDATE", start),
                ("NTP_DLS_EDATE", end),
            ])
            .await
    }

    pub async fn disable_daylight_saving(&self) -> Result<(), Error> {
        self.form
            .submit(&[("NTP_MANU", "0"), ("NTP_DLS_EN", "0")])
            .await
    }

    /// Switch to the manual clock with a `MM/DD/YYYY` date and `HH:MM:SS` time.
    pub async fn set_manual_time(&self, date: &str, time: &str) -> Result<(), Error> {
        self.form
            .submit(&[
                ("NTP_MANU", "1"),
                ("NTP_USE_PCTIME", "0"),
                ("NTP_SYSDATE", date),
                ("NTP_SYSTIME", time),
            ])
            .await
    }

    /// Switch to the manual clock synced from the submitting PC's time.
    pub async fn use_local_time(&self) -> Result<(), Error> {
        self.form
            .submit(&[("NTP_MANU", "1"), ("NTP_USE_PCTIME", "1")])
            .await
    }

    pub async fn set_primary_server(&self, server: &str) -> Result<(), Error> {
        self.form
            .submit(&[("NTP_MANU", "0"), ("NTP_IP1", server)])
            .await
    }

    pub async fn set_secondary_server(&self, server: &str) -> Result<(), Error> {
        self.form
            .submit(&[("NTP_MANU", "0"), ("NTP_IP2", server)])
            .await
    }

    pub async fn set_time_zone(&self, zone: &str) -> Result<(), Error> {
        let index = zone_index(zone)?.to_string();
        self.form
            .submit(&[("NTP_MANU", "0"), ("NTP_ZONE", index.as_str())])
            .await
    }

    pub async fn primary_server(&self) -> Result<Option<String>, Error> {
        self.server("Server1").await
    }

    pub async fn secondary_server(&self) -> Result<Option<String>, Error> {
        self.server("Server2").await
    }

    /// Syslog slots share the `Server<n>` suffix and are skipped.
    async fn server(&self, needle: &str) -> Result<Option<String>, Error> {
        let config = self.form.system_config().await?;
        Ok(config
            .find_all(needle)
            .find(|(key, _)| !key.contains(SYSLOG_KEY))
            .map(|(_, value)| value.to_owned())
            .filter(|value| !value.is_empty()))
    }
}
