pub mod aggregate;

pub use aggregate::{
    Complaint, ComplaintId, ComplaintStatus, FileComplaintRequest, UpdateComplaintStatusRequest,
    MIN_DESCRIPTION_LEN,
};
