pub mod summary;
pub use summary::summary;

pub mod daily;
pub use daily::daily_summary;

pub mod monthly;
pub use monthly::monthly_summary;

pub mod overbudget;
pub use overbudget::check_overbudget;

pub mod advice;
pub use advice::advice;

pub mod counts;
pub use counts::transaction_counts;
