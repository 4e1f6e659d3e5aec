use glam::Vec3;

use crate::materials::GoldId;

/// Creates and destroys the visual proxy of a revealed gold particle.
///
/// The pan calls `spawn` exactly once when a particle is revealed and
/// `despawn` when that particle leaves the pan, whether collected or rinsed.
pub trait NuggetPresenter {
    type Handle;

    /// Returning `None` means the particle has no proxy (for example when no
    /// nugget asset is configured); it is still revealed and collectible.
    fn spawn(&mut self, id: GoldId, local_position: Vec3) -> Option<Self::Handle>;

    fn despawn(&mut self, handle: Self::Handle);
}

/// Presenter for headless runs. Hands out unit handles so the pan still
/// tracks which particles have a proxy.
#[derive(Clone, Copy, Debug, Default)]
pub struct HeadlessPresenter;

impl NuggetPresenter for HeadlessPresenter {
    type Handle = ();

    fn spawn(&mut self, _id: GoldId, _local_position: Vec3) -> Option<()> {
        Some(())
    }

    fn despawn(&mut self, _handle: ()) {}
}
