//! Dimensions and layout directions.
//!
//! Lengths keep their absolute part in points and their font-relative part
//! in `em`; the em part is only resolved by layout, so comparisons of
//! lengths with an em part are undefined.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::{Add, Div, Mul, Neg, Sub};

use super::{format_float, hash_f64};

/// A length: absolute points plus font-relative em.
#[derive(Copy, Clone, Default, PartialEq, Debug)]
pub struct Length {
    pub abs: f64,
    pub em: f64,
}

impl Length {
    pub const fn zero() -> Self {
        Length { abs: 0.0, em: 0.0 }
    }

    pub const fn pt(abs: f64) -> Self {
        Length { abs, em: 0.0 }
    }

    pub fn mm(mm: f64) -> Self {
        Length::pt(mm * 72.0 / 25.4)
    }

    pub fn cm(cm: f64) -> Self {
        Length::pt(cm * 72.0 / 2.54)
    }

    pub fn inches(inches: f64) -> Self {
        Length::pt(inches * 72.0)
    }

    pub const fn em(em: f64) -> Self {
        Length { abs: 0.0, em }
    }

    pub fn is_zero(self) -> bool {
        self.abs == 0.0 && self.em == 0.0
    }

    /// Compare two lengths; defined only when neither has an em part.
    pub fn try_cmp(self, other: Length) -> Option<Ordering> {
        if self.em != 0.0 || other.em != 0.0 {
            return None;
        }
        self.abs.partial_cmp(&other.abs)
    }

    /// The absolute part in the given unit.
    pub fn to_mm(self) -> f64 {
        self.abs * 25.4 / 72.0
    }

    pub fn to_cm(self) -> f64 {
        self.abs * 2.54 / 72.0
    }

    pub fn to_inches(self) -> f64 {
        self.abs / 72.0
    }
}

impl fmt::Display for Length {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.abs == 0.0, self.em == 0.0) {
            (false, false) => write!(
                f,
                "{}pt + {}em",
                format_float(round2(self.abs)),
                format_float(round2(self.em))
            ),
            (true, false) => write!(f, "{}em", format_float(round2(self.em))),
            _ => write!(f, "{}pt", format_float(round2(self.abs))),
        }
    }
}

impl Hash for Length {
    fn hash<H: Hasher>(&self, state: &mut H) {
        hash_f64(self.abs, state);
        hash_f64(self.em, state);
    }
}

impl Neg for Length {
    type Output = Length;
    fn neg(self) -> Length {
        Length {
            abs: -self.abs,
            em: -self.em,
        }
    }
}

impl Add for Length {
    type Output = Length;
    fn add(self, other: Length) -> Length {
        Length {
            abs: self.abs + other.abs,
            em: self.em + other.em,
        }
    }
}

impl Sub for Length {
    type Output = Length;
    fn sub(self, other: Length) -> Length {
        self + -other
    }
}

impl Mul<f64> for Length {
    type Output = Length;
    fn mul(self, factor: f64) -> Length {
        Length {
            abs: self.abs * factor,
            em: self.em * factor,
        }
    }
}

impl Div<f64> for Length {
    type Output = Length;
    fn div(self, divisor: f64) -> Length {
        Length {
            abs: self.abs / divisor,
            em: self.em / divisor,
        }
    }
}

/// An angle, stored in radians.
#[derive(Copy, Clone, Default, PartialEq, PartialOrd, Debug)]
pub struct Angle(pub f64);

impl Angle {
    pub fn deg(deg: f64) -> Self {
        Angle(deg.to_radians())
    }

    pub const fn rad(rad: f64) -> Self {
        Angle(rad)
    }

    pub fn to_deg(self) -> f64 {
        self.0.to_degrees()
    }

    pub fn to_rad(self) -> f64 {
        self.0
    }
}

impl fmt::Display for Angle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}deg", format_float(round2(self.to_deg())))
    }
}

impl Hash for Angle {
    fn hash<H: Hasher>(&self, state: &mut H) {
        hash_f64(self.0, state);
    }
}

/// A ratio of the available space: `50%` is `Ratio(0.5)`.
#[derive(Copy, Clone, Default, PartialEq, PartialOrd, Debug)]
pub struct Ratio(pub f64);

impl Ratio {
    pub fn is_zero(self) -> bool {
        self.0 == 0.0
    }
}

impl fmt::Display for Ratio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", format_float(round2(self.0 * 100.0)))
    }
}

impl Hash for Ratio {
    fn hash<H: Hasher>(&self, state: &mut H) {
        hash_f64(self.0, state);
    }
}

/// A length relative to the available space: `50% + 10pt`.
#[derive(Copy, Clone, Default, PartialEq, Hash, Debug)]
pub struct Relative {
    pub rel: Ratio,
    pub abs: Length,
}

impl fmt::Display for Relative {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.rel.is_zero(), self.abs.is_zero()) {
            (false, false) => write!(f, "{} + {}", self.rel, self.abs),
            (false, true) => write!(f, "{}", self.rel),
            _ => write!(f, "{}", self.abs),
        }
    }
}

impl Neg for Relative {
    type Output = Relative;
    fn neg(self) -> Relative {
        Relative {
            rel: Ratio(-self.rel.0),
            abs: -self.abs,
        }
    }
}

impl Add for Relative {
    type Output = Relative;
    fn add(self, other: Relative) -> Relative {
        Relative {
            rel: Ratio(self.rel.0 + other.rel.0),
            abs: self.abs + other.abs,
        }
    }
}

impl Mul<f64> for Relative {
    type Output = Relative;
    fn mul(self, factor: f64) -> Relative {
        Relative {
            rel: Ratio(self.rel.0 * factor),
            abs: self.abs * factor,
        }
    }
}

impl From<Length> for Relative {
    fn from(abs: Length) -> Self {
        Relative {
            rel: Ratio(0.0),
            abs,
        }
    }
}

impl From<Ratio> for Relative {
    fn from(rel: Ratio) -> Self {
        Relative {
            rel,
            abs: Length::zero(),
        }
    }
}

/// A share of the remaining space: `1fr`.
#[derive(Copy, Clone, Default, PartialEq, PartialOrd, Debug)]
pub struct Fraction(pub f64);

impl fmt::Display for Fraction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}fr", format_float(round2(self.0)))
    }
}

impl Hash for Fraction {
    fn hash<H: Hasher>(&self, state: &mut H) {
        hash_f64(self.0, state);
    }
}

/// Round to two decimal places to hide unit-conversion noise in output.
fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// Horizontal alignment.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum HAlignment {
    Start,
    Left,
    Center,
    Right,
    End,
}

/// Vertical alignment.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum VAlignment {
    Top,
    Horizon,
    Bottom,
}

/// An alignment along one or both axes.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct Alignment {
    pub x: Option<HAlignment>,
    pub y: Option<VAlignment>,
}

impl Alignment {
    pub const START: Alignment = Alignment::h(HAlignment::Start);
    pub const LEFT: Alignment = Alignment::h(HAlignment::Left);
    pub const CENTER: Alignment = Alignment::h(HAlignment::Center);
    pub const RIGHT: Alignment = Alignment::h(HAlignment::Right);
    pub const END: Alignment = Alignment::h(HAlignment::End);
    pub const TOP: Alignment = Alignment::v(VAlignment::Top);
    pub const HORIZON: Alignment = Alignment::v(VAlignment::Horizon);
    pub const BOTTOM: Alignment = Alignment::v(VAlignment::Bottom);

    const fn h(x: HAlignment) -> Self {
        Alignment { x: Some(x), y: None }
    }

    const fn v(y: VAlignment) -> Self {
        Alignment { x: None, y: Some(y) }
    }

    /// Combine a horizontal and a vertical alignment.
    pub fn combine(self, other: Alignment) -> Result<Alignment, String> {
        match (self, other) {
            (
                Alignment { x: Some(x), y: None },
                Alignment { x: None, y: Some(y) },
            )
            | (
                Alignment { x: None, y: Some(y) },
                Alignment { x: Some(x), y: None },
            ) => Ok(Alignment {
                x: Some(x),
                y: Some(y),
            }),
            (Alignment { x: Some(_), .. }, Alignment { x: Some(_), .. }) => {
                Err("cannot add two horizontal alignments".into())
            }
            (Alignment { y: Some(_), .. }, Alignment { y: Some(_), .. }) => {
                Err("cannot add two vertical alignments".into())
            }
            _ => Err("cannot add two 2D alignments".into()),
        }
    }

    /// The axis of a one-dimensional alignment.
    pub fn axis(self) -> Option<&'static str> {
        match (self.x, self.y) {
            (Some(_), None) => Some("horizontal"),
            (None, Some(_)) => Some("vertical"),
            _ => None,
        }
    }

    /// The opposite alignment; `center` and `horizon` are their own inverse.
    #[must_use]
    pub fn inv(self) -> Alignment {
        Alignment {
            x: self.x.map(|x| match x {
                HAlignment::Start => HAlignment::End,
                HAlignment::End => HAlignment::Start,
                HAlignment::Left => HAlignment::Right,
                HAlignment::Right => HAlignment::Left,
                HAlignment::Center => HAlignment::Center,
            }),
            y: self.y.map(|y| match y {
                VAlignment::Top => VAlignment::Bottom,
                VAlignment::Bottom => VAlignment::Top,
                VAlignment::Horizon => VAlignment::Horizon,
            }),
        }
    }
}

impl fmt::Display for Alignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let x = self.x.map(|x| match x {
            HAlignment::Start => "start",
            HAlignment::Left => "left",
            HAlignment::Center => "center",
            HAlignment::Right => "right",
            HAlignment::End => "end",
        });
        let y = self.y.map(|y| match y {
            VAlignment::Top => "top",
            VAlignment::Horizon => "horizon",
            VAlignment::Bottom => "bottom",
        });
        match (x, y) {
            (Some(x), Some(y)) => write!(f, "{x} + {y}"),
            (Some(one), None) | (None, Some(one)) => f.write_str(one),
            (None, None) => f.write_str("start"),
        }
    }
}

/// A layout direction.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Direction {
    Ltr,
    Rtl,
    Ttb,
    Btt,
}

impl Direction {
    pub fn from_name(name: &str) -> Option<Direction> {
        Some(match name {
            "ltr" => Direction::Ltr,
            "rtl" => Direction::Rtl,
            "ttb" => Direction::Ttb,
            "btt" => Direction::Btt,
            _ => return None,
        })
    }

    pub const fn name(self) -> &'static str {
        match self {
            Direction::Ltr => "ltr",
            Direction::Rtl => "rtl",
            Direction::Ttb => "ttb",
            Direction::Btt => "btt",
        }
    }

    pub const fn axis(self) -> &'static str {
        match self {
            Direction::Ltr | Direction::Rtl => "horizontal",
            Direction::Ttb | Direction::Btt => "vertical",
        }
    }

    /// The alignment at which the direction starts.
    pub const fn start(self) -> Alignment {
        match self {
            Direction::Ltr => Alignment::LEFT,
            Direction::Rtl => Alignment::RIGHT,
            Direction::Ttb => Alignment::TOP,
            Direction::Btt => Alignment::BOTTOM,
        }
    }

    /// The alignment at which the direction ends.
    pub const fn end(self) -> Alignment {
        self.inv().start()
    }

    #[must_use]
    pub const fn inv(self) -> Direction {
        match self {
            Direction::Ltr => Direction::Rtl,
            Direction::Rtl => Direction::Ltr,
            Direction::Ttb => Direction::Btt,
            Direction::Btt => Direction::Ttb,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
