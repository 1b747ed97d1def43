//! Pure classification of a scanned ticket.
//!
//! Given the office and department logs fetched for a ticket and the
//! department the kiosk is operating for, [`classify`] decides which
//! workflow handles the scan. No I/O and no mutation, just a projection
//! over the two fetched records, so every branch is unit-testable.

use gateway::types::{DepartmentLog, OfficeLog};

/// The department this kiosk signs visitors into, passed explicitly with
/// every scan rather than read from ambient state.
#[derive(Debug, Clone, PartialEq)]
pub struct TargetDepartment {
    pub department_id: i64,
    pub office_id: i64,
    pub name: String,
}

/// Exactly one of these holds for any scan, carrying the records the
/// downstream workflow needs.
#[derive(Debug, Clone, PartialEq)]
pub enum ScanClassification {
    /// No office log matches the ticket.
    NotFound,
    /// The office log exists but is already closed.
    AlreadyLoggedOut { office_log: OfficeLog },
    /// Signed into this kiosk's office with no active department visit:
    /// collect a purpose and open a department log.
    SameOfficeActive { office_log: OfficeLog },
    /// Signed into this kiosk's office with an active department visit:
    /// proceed to department sign-out.
    SameOfficeSignOut {
        office_log: OfficeLog,
        department_log: DepartmentLog,
    },
    /// Signed into a different office: an operator-confirmed transfer must
    /// cascade the stale logs closed before signing in here.
    CrossOfficeTransfer {
        office_log: OfficeLog,
        department_log: Option<DepartmentLog>,
    },
}

/// Classifies a scan. Decision order, first match wins:
///
/// 1. no office log: `NotFound`
/// 2. office log closed: `AlreadyLoggedOut`
/// 3. office matches the target: `SameOfficeActive` when there is no
///    department log or only a closed one, `SameOfficeSignOut` when one is
///    still open
/// 4. office differs: `CrossOfficeTransfer`
pub fn classify(
    office_log: Option<OfficeLog>,
    department_log: Option<DepartmentLog>,
    target: &TargetDepartment,
) -> ScanClassification {
    let Some(office_log) = office_log else {
        return ScanClassification::NotFound;
    };

    if office_log.log_out.is_some() {
        return ScanClassification::AlreadyLoggedOut { office_log };
    }

    if office_log.office_id == target.office_id {
        return match department_log {
            Some(department_log) if department_log.is_open() => {
                ScanClassification::SameOfficeSignOut {
                    office_log,
                    department_log,
                }
            }
            _ => ScanClassification::SameOfficeActive { office_log },
        };
    }

    ScanClassification::CrossOfficeTransfer {
        office_log,
        department_log,
    }
}
