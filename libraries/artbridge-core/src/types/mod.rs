mod actor;
mod artist;
mod events;
mod page;

pub use actor::{Actor, Privilege};
pub use artist::{
    Artist, ArtistId, ArtistPatch, ArtistProfile, ArtistStatus, CreateArtist, Owner, OwnerId,
};
pub use events::{IdentityChangeEvent, NameRequestEvent};
pub use page::{Page, PageRequest, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
