pub mod callbacks;
pub mod home;
pub mod market;
pub mod mypage;
pub mod studio;
