use alloc::borrow::Cow;
use alloc::sync::Arc;
use core::fmt;

/// Which of the two nested containers a description is for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ContainerSlot {
    /// The scrolling viewport.
    Outer,
    /// The content box sized to the total list height.
    Inner,
}

/// Layout the engine needs a container to honor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WrapperProps {
    pub slot: ContainerSlot,
    /// Height in pixels: the viewport size for [`ContainerSlot::Outer`], the total content
    /// height for [`ContainerSlot::Inner`].
    pub main_size: u64,
}

/// What the host should create for one container.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContainerSpec {
    /// Element tag for native containers; `None` when a custom factory renders it.
    pub tag: Option<Cow<'static, str>>,
    pub role: Option<&'static str>,
    pub tab_index: Option<i32>,
    pub props: WrapperProps,
}

/// A host-provided container implementation.
///
/// Custom containers only receive the wrapper props; list semantics and focusability are
/// theirs to decide.
pub trait ContainerFactory: Send + Sync {
    fn describe(&self, props: WrapperProps) -> ContainerSpec;
}

/// The element used for a container, chosen at construction.
#[derive(Clone)]
pub enum Container {
    Native { tag: Cow<'static, str> },
    Custom(Arc<dyn ContainerFactory>),
}

impl Container {
    pub fn native(tag: impl Into<Cow<'static, str>>) -> Self {
        Self::Native { tag: tag.into() }
    }

    pub fn custom(factory: impl ContainerFactory + 'static) -> Self {
        Self::Custom(Arc::new(factory))
    }

    pub fn is_native(&self) -> bool {
        matches!(self, Self::Native { .. })
    }

    /// Native containers are marked up as a list, and become focusable when keyboard
    /// navigation is on.
    pub fn describe(&self, props: WrapperProps, keyboard_navigation: bool) -> ContainerSpec {
        match self {
            Self::Native { tag } => ContainerSpec {
                tag: Some(tag.clone()),
                role: Some("list"),
                tab_index: keyboard_navigation.then_some(0),
                props,
            },
            Self::Custom(factory) => factory.describe(props),
        }
    }
}

impl Default for Container {
    fn default() -> Self {
        Self::native("div")
    }
}

impl fmt::Debug for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Native { tag } => f.debug_struct("Native").field("tag", tag).finish(),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}
