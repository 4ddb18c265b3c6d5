use std::fmt;

use rand::Rng;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MenuItem {
    Chilli,
    HalfSmoke,
    HotDog,
    ChilliCheeseFries,
    Shake,
    HotCakes,
    Cake,
    Hamburger,
    VeggieBurger,
    OnionRings,
}

impl MenuItem {
    pub const ALL: [MenuItem; 10] = [
        MenuItem::Chilli,
        MenuItem::HalfSmoke,
        MenuItem::HotDog,
        MenuItem::ChilliCheeseFries,
        MenuItem::Shake,
        MenuItem::HotCakes,
        MenuItem::Cake,
        MenuItem::Hamburger,
        MenuItem::VeggieBurger,
        MenuItem::OnionRings,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            MenuItem::Chilli => "BensChilli",
            MenuItem::HalfSmoke => "BensHalfSmoke",
            MenuItem::HotDog => "BensHotDog",
            MenuItem::ChilliCheeseFries => "BensChilliCheeseFries",
            MenuItem::Shake => "BensShake",
            MenuItem::HotCakes => "BensHotCakes",
            MenuItem::Cake => "BensCake",
            MenuItem::Hamburger => "BensHamburger",
            MenuItem::VeggieBurger => "BensVeggieBurger",
            MenuItem::OnionRings => "BensOnionRings",
        }
    }
}

impl fmt::Display for MenuItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Picks a menu item uniformly at random.
pub fn pick_random<R: Rng + ?Sized>(rng: &mut R) -> MenuItem {
    MenuItem::ALL[rng.gen_range(0..MenuItem::ALL.len())]
}

pub fn pick_random_thread() -> MenuItem {
    pick_random(&mut rand::thread_rng())
}
