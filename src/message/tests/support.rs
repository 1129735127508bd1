//! Shared test fixtures.

use chrono::{DateTime, Local, TimeZone, Utc};
use mockable::Clock;
use rstest::fixture;

use crate::message::domain::{
    ConnectionParameters, DicomOperation, DicomOperationKind, Endpoint, FileOrDirectory,
};

/// A clock frozen at a known instant.
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn local(&self) -> DateTime<Local> {
        self.0.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.0
    }
}

#[fixture]
pub fn fixed_clock() -> FixedClock {
    let instant = Utc
        .with_ymd_and_hms(2024, 5, 1, 12, 30, 0)
        .single()
        .expect("valid fixed instant");
    FixedClock(instant)
}

#[fixture]
pub fn scu() -> Endpoint {
    Endpoint::new("SCU", "localhost", Some(0))
}

#[fixture]
pub fn scp() -> Endpoint {
    Endpoint::new("SCP", "localhost", Some(4242))
}

#[fixture]
pub fn c_store(scu: Endpoint, scp: Endpoint) -> DicomOperation {
    DicomOperation::new(DicomOperationKind::CStore, scu, scp)
        .with_connection(
            ConnectionParameters::new()
                .with_dimse_timeout(30)
                .with_acse_timeout(10),
        )
        .with_op_parameters(FileOrDirectory::from_file("/path/to/filename.dcm"))
        .expect("C-STORE accepts file parameters")
}
