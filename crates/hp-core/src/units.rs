// hp-core/src/units.rs

use uom::si::f64::{
    Acceleration as UomAcceleration, AngularVelocity as UomAngularVelocity, Force as UomForce,
    Length as UomLength, Mass as UomMass,
};

// Public canonical unit types (SI, f64)
pub type Accel = UomAcceleration;
pub type AngularVelocity = UomAngularVelocity;
pub type Force = UomForce;
pub type Length = UomLength;
pub type Mass = UomMass;

#[inline]
pub fn kg(v: f64) -> Mass {
    use uom::si::mass::kilogram;
    Mass::new::<kilogram>(v)
}

#[inline]
pub fn m(v: f64) -> Length {
    use uom::si::length::meter;
    Length::new::<meter>(v)
}

#[inline]
pub fn n(v: f64) -> Force {
    use uom::si::force::newton;
    Force::new::<newton>(v)
}

#[inline]
pub fn mps2(v: f64) -> Accel {
    use uom::si::acceleration::meter_per_second_squared;
    Accel::new::<meter_per_second_squared>(v)
}

#[inline]
pub fn rad_per_s(v: f64) -> AngularVelocity {
    use uom::si::angular_velocity::radian_per_second;
    AngularVelocity::new::<radian_per_second>(v)
}

pub mod constants {
    use super::*;

    /// Gravity used by the reference hopper (rounded standard gravity).
    pub const G_MPS2: f64 = 9.81;

    #[inline]
    pub fn g() -> Accel {
        mps2(G_MPS2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors_store_si_values() {
        use uom::si::{acceleration, angular_velocity, force, length, mass};

        assert_eq!(kg(0.1).get::<mass::kilogram>(), 0.1);
        assert_eq!(m(1.0).get::<length::meter>(), 1.0);
        assert_eq!(n(4.0).get::<force::newton>(), 4.0);
        assert_eq!(
            rad_per_s(5.0).get::<angular_velocity::radian_per_second>(),
            5.0
        );
        assert_eq!(
            constants::g().get::<acceleration::meter_per_second_squared>(),
            9.81
        );
    }
}
