//! Component types stored per scene node

use glam::{Mat4, Quat, Vec3, Vec4};
use serde::{Deserialize, Serialize};

use super::animation::AnimHandle;

/// Local-space transform of a node
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Transform {
    /// Translation in parent space
    pub translation: Vec3,
    /// Rotation in parent space as a unit quaternion
    pub rotation: Quat,
    /// Scale in parent space
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            translation: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    /// Create a new transform with the given translation
    pub fn from_translation(translation: Vec3) -> Self {
        Self {
            translation,
            ..Default::default()
        }
    }

    /// Convert this transform to a transformation matrix
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.translation)
    }
}

/// Axis-aligned bounds of a node, in local and world space
///
/// The transformed extents are refreshed by [`Scene::update`] and consumed
/// read-only by the editor (widget centroid, overlay boxes).
///
/// [`Scene::update`]: super::Scene::update
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct BoundingVolume {
    /// Untransformed minimum extents
    pub min_extents: Vec3,
    /// Untransformed maximum extents
    pub max_extents: Vec3,
    /// World-space minimum extents
    pub transformed_min_extents: Vec3,
    /// World-space maximum extents
    pub transformed_max_extents: Vec3,
}

impl Default for BoundingVolume {
    fn default() -> Self {
        // Unit cube so empty nodes remain selectable and contribute a
        // sensible centroid
        Self {
            min_extents: Vec3::splat(-0.5),
            max_extents: Vec3::splat(0.5),
            transformed_min_extents: Vec3::splat(-0.5),
            transformed_max_extents: Vec3::splat(0.5),
        }
    }
}

/// Light type
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum LightKind {
    /// Directional light (azimuth/zenith in `data.x/y`)
    Directional,
    /// Point light (radius in `data.x`)
    Point,
    /// Spot light (azimuth/zenith/cutoff in `data.x/y/z`)
    Spot,
}

/// Light component
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Light {
    pub kind: LightKind,
    pub colour: Vec3,
    /// Kind-dependent parameters, see [`LightKind`]
    pub data: Vec4,
}

impl Default for Light {
    fn default() -> Self {
        Self {
            kind: LightKind::Point,
            colour: Vec3::ONE,
            data: Vec4::new(10.0, 0.0, 0.0, 0.0),
        }
    }
}

/// Animation playback state of a node
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AnimController {
    /// Animations bound to this node's rig
    pub handles: Vec<AnimHandle>,
    /// Animation currently driving the rig
    pub current: Option<AnimHandle>,
    /// Current playback frame
    pub current_frame: i32,
    /// Whether playback advances each update
    pub playing: bool,
    /// Offset of the first animated joint in the node's joint list
    pub joints_offset: i32,
    /// Whether the trajectory channel feeds back into the node transform
    pub apply_root_motion: bool,
}

macro_rules! flag_set {
    ($(#[$meta:meta])* $name:ident { $($(#[$fmeta:meta])* $flag:ident = $bit:expr;)* }) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(u32);

        impl $name {
            /// Empty set
            pub const NONE: Self = Self(0);
            $($(#[$fmeta])* pub const $flag: Self = Self(1 << $bit);)*

            /// Whether every flag in `other` is set
            pub fn contains(self, other: Self) -> bool {
                self.0 & other.0 == other.0
            }

            /// Set the given flags
            pub fn insert(&mut self, other: Self) {
                self.0 |= other.0;
            }

            /// Clear the given flags
            pub fn remove(&mut self, other: Self) {
                self.0 &= !other.0;
            }

            /// Set or clear the given flags
            pub fn set(&mut self, other: Self, value: bool) {
                if value {
                    self.insert(other);
                } else {
                    self.remove(other);
                }
            }
        }

        impl std::ops::BitOr for $name {
            type Output = Self;
            fn bitor(self, rhs: Self) -> Self {
                Self(self.0 | rhs.0)
            }
        }

        impl std::ops::BitOrAssign for $name {
            fn bitor_assign(&mut self, rhs: Self) {
                self.0 |= rhs.0;
            }
        }
    };
}

flag_set! {
    /// Component membership of a node
    NodeFlags {
        /// Slot is in use
        ALLOCATED = 0;
        /// Transform has been edited
        TRANSFORM = 1;
        /// Carries a light component
        LIGHT = 2;
        /// Node is a rig joint
        BONE = 3;
        /// Carries an animation controller
        ANIM_CONTROLLER = 4;
        /// Joint is a root-motion trajectory
        ANIM_TRAJECTORY = 5;
    }
}

impl NodeFlags {
    pub fn is_allocated(self) -> bool {
        self.contains(Self::ALLOCATED)
    }

    pub fn has_light(self) -> bool {
        self.contains(Self::LIGHT)
    }

    pub fn has_bone(self) -> bool {
        self.contains(Self::BONE)
    }

    pub fn has_anim_controller(self) -> bool {
        self.contains(Self::ANIM_CONTROLLER)
    }

    pub fn has_anim_trajectory(self) -> bool {
        self.contains(Self::ANIM_TRAJECTORY)
    }
}

flag_set! {
    /// Debug overlay toggles for a scene
    ViewFlags {
        /// Skip drawing the scene entirely
        HIDE = 0;
        /// Bounds of the selected nodes
        SELECTED_NODE = 1;
        /// Ground grid
        GRID = 2;
        /// Per-node coordinate frames
        MATRICES = 3;
        /// Rig joints and trajectory markers
        BONES = 4;
        /// All world-space bounding boxes
        AABB = 5;
        /// Light markers
        LIGHTS = 6;
    }
}

impl ViewFlags {
    /// Overlay flags in panel order, paired with their labels
    pub const LABELLED: [(Self, &'static str); 7] = [
        (Self::HIDE, "Hide Scene"),
        (Self::SELECTED_NODE, "Selected Node"),
        (Self::GRID, "Grid"),
        (Self::MATRICES, "Matrices"),
        (Self::BONES, "Bones"),
        (Self::AABB, "AABB"),
        (Self::LIGHTS, "Lights"),
    ];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transform_default() {
        let transform = Transform::default();
        assert_eq!(transform.translation, Vec3::ZERO);
        assert_eq!(transform.rotation, Quat::IDENTITY);
        assert_eq!(transform.scale, Vec3::ONE);
    }

    #[test]
    fn test_transform_to_matrix() {
        let transform = Transform::from_translation(Vec3::new(1.0, 2.0, 3.0));
        let matrix = transform.to_matrix();
        assert_eq!(matrix.w_axis.truncate(), transform.translation);
    }

    #[test]
    fn test_node_flags_predicates() {
        let mut flags = NodeFlags::NONE;
        assert!(!flags.is_allocated());

        flags.insert(NodeFlags::ALLOCATED | NodeFlags::LIGHT);
        assert!(flags.is_allocated());
        assert!(flags.has_light());
        assert!(!flags.has_bone());

        flags.remove(NodeFlags::LIGHT);
        assert!(!flags.has_light());
        assert!(flags.is_allocated());
    }

    #[test]
    fn test_flags_serialize_transparent() {
        let flags = NodeFlags::ALLOCATED | NodeFlags::BONE;
        let json = serde_json::to_string(&flags).unwrap();
        let back: NodeFlags = serde_json::from_str(&json).unwrap();
        assert_eq!(flags, back);
    }
}
