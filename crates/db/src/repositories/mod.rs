//! Repository layer: one zero-sized struct per table, each implementing
//! [`Resource`](crate::resource::Resource).

pub mod actor_repo;
pub mod cinema_room_repo;
pub mod genre_repo;
pub mod movie_repo;

pub use actor_repo::ActorRepo;
pub use cinema_room_repo::CinemaRoomRepo;
pub use genre_repo::GenreRepo;
pub use movie_repo::MovieRepo;
