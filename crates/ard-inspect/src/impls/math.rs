use ard_math::{euler_degrees, normalize_or_identity, Mat4, Quat, Vec2, Vec3, Vec3A, Vec4};

use crate::{
    descriptor::{TypeDescriptor, TypeFlags},
    error::InspectError,
    value::{Inspect, Member},
};

macro_rules! inspect_vector {
    ($ty:ty, $($axis:ident),+) => {
        impl Inspect for $ty {
            #[inline]
            fn descriptor(&self) -> TypeDescriptor {
                TypeDescriptor::of::<$ty>(TypeFlags::VALUE_TYPE)
            }

            fn display(&self) -> Result<String, InspectError> {
                Ok(self.to_string())
            }

            fn members(&self) -> Result<Vec<Member>, InspectError> {
                Ok(vec![
                    $(Member::field(stringify!($axis), &self.$axis),)+
                    Member::field("magnitude", &self.length()),
                    Member::field("sqr Magnitude", &self.length_squared()),
                    Member::field("normalized", &self.normalize_or_zero()),
                ])
            }
        }
    };
}

inspect_vector!(Vec2, x, y);
inspect_vector!(Vec3, x, y, z);
inspect_vector!(Vec3A, x, y, z);
inspect_vector!(Vec4, x, y, z, w);

impl Inspect for Quat {
    #[inline]
    fn descriptor(&self) -> TypeDescriptor {
        TypeDescriptor::of::<Quat>(TypeFlags::VALUE_TYPE)
    }

    fn display(&self) -> Result<String, InspectError> {
        Ok(self.to_string())
    }

    fn members(&self) -> Result<Vec<Member>, InspectError> {
        Ok(vec![
            Member::field("x", &self.x),
            Member::field("y", &self.y),
            Member::field("z", &self.z),
            Member::field("w", &self.w),
            Member::field("eulerAngles", &euler_degrees(*self)),
            Member::field("normalized", &normalize_or_identity(*self)),
        ])
    }
}

impl Inspect for Mat4 {
    #[inline]
    fn descriptor(&self) -> TypeDescriptor {
        TypeDescriptor::of::<Mat4>(TypeFlags::VALUE_TYPE)
    }

    fn members(&self) -> Result<Vec<Member>, InspectError> {
        Ok(vec![
            Member::field("x_axis", &self.x_axis),
            Member::field("y_axis", &self.y_axis),
            Member::field("z_axis", &self.z_axis),
            Member::field("w_axis", &self.w_axis),
        ])
    }
}
