//! Vehicles domain module (repair orders and the views built over them).
//!
//! Pure domain logic: callers load repair orders, part lines, and work-queue
//! entries from storage and pass them in.

pub mod deliveries;
pub mod filter;
pub mod repair_order;
pub mod schedule;
pub mod work_queue;

pub use deliveries::{
    build_deliveries, CarDeliveries, Deliveries, DeliveryPart, VendorCar, VendorDeliveries,
    VendorParts,
};
pub use filter::VehicleStatusFilter;
pub use repair_order::{RepairOrder, SCHEDULED_PHASE};
pub use schedule::{build_schedule, ProductionSchedule, ScheduleGroup, ScheduledCar, UNASSIGNED};
pub use work_queue::{
    build_board, next_priority, BoardEntry, NewWorkQueueEntry, WorkBoard, WorkQueueEntry,
    WorkQueuePatch, WorkStatus, PAINT_DEPARTMENT,
};
