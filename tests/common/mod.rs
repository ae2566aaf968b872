//! Hand-written message types in the exact shape the code generator emits
#![allow(dead_code)]

use extprot::decode::{self, TupleReader};
use extprot::defaults::default_or_missing;
use extprot::{
    DecodeContext, Error, MessageRead, MessageWrite, Reader, Result, StringReader, WireDefault,
    WireType, Writer,
};

/// `message sample = { seq : int; label : string }`
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub seq: i32,
    pub label: String,
}

impl MessageWrite for Sample {
    fn write_message(&self, w: &mut Writer<'_>) -> Result<()> {
        w.write_tuple(0, 2, |w| {
            w.write_int(0, self.seq)?;
            w.write_string(0, &self.label)
        })
    }
}

impl MessageRead for Sample {
    fn read_message<R: Reader>(r: &mut R, cx: DecodeContext) -> Result<Sample> {
        let p = r.read_prefix()?;
        match p.wire_type {
            WireType::Tuple => {
                let mut t = TupleReader::begin(r, cx)?;
                let seq = match t.element(decode::read_int)? {
                    Some(v) => v,
                    None => default_or_missing::<i32>("sample.seq")?,
                };
                let label = match t.element(decode::read_string)? {
                    Some(v) => v,
                    None => default_or_missing::<String>("sample.label")?,
                };
                t.finish()?;
                Ok(Sample { seq, label })
            }
            WireType::Enum => Ok(Sample {
                seq: 0,
                label: String::new(),
            }),
            w => Err(Error::BadWireType(w.nibble())),
        }
    }
}

impl WireDefault for Sample {
    fn wire_default() -> Option<Sample> {
        Some(Sample {
            seq: 0,
            label: String::new(),
        })
    }
}

/// The same message one schema revision later:
/// `message sample = { seq : int; label : string; weight : float }`
#[derive(Debug, Clone, PartialEq)]
pub struct SampleV2 {
    pub seq: i32,
    pub label: String,
    pub weight: f64,
}

impl MessageWrite for SampleV2 {
    fn write_message(&self, w: &mut Writer<'_>) -> Result<()> {
        w.write_tuple(0, 3, |w| {
            w.write_int(0, self.seq)?;
            w.write_string(0, &self.label)?;
            w.write_float(0, self.weight)
        })
    }
}

impl MessageRead for SampleV2 {
    fn read_message<R: Reader>(r: &mut R, cx: DecodeContext) -> Result<SampleV2> {
        let p = r.read_prefix()?;
        match p.wire_type {
            WireType::Tuple => {
                let mut t = TupleReader::begin(r, cx)?;
                let seq = match t.element(decode::read_int)? {
                    Some(v) => v,
                    None => default_or_missing::<i32>("sample.seq")?,
                };
                let label = match t.element(decode::read_string)? {
                    Some(v) => v,
                    None => default_or_missing::<String>("sample.label")?,
                };
                let weight = match t.element(decode::read_float)? {
                    Some(v) => v,
                    None => default_or_missing::<f64>("sample.weight")?,
                };
                t.finish()?;
                Ok(SampleV2 { seq, label, weight })
            }
            WireType::Enum => Ok(SampleV2 {
                seq: 0,
                label: String::new(),
                weight: 0.0,
            }),
            w => Err(Error::BadWireType(w.nibble())),
        }
    }
}

/// `type severity = Low | Medium | High | Critical`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

pub fn write_severity(w: &mut Writer<'_>, v: &Severity) -> Result<()> {
    let tag = match v {
        Severity::Low => 0,
        Severity::Medium => 1,
        Severity::High => 2,
        Severity::Critical => 3,
    };
    w.write_enum(tag)
}

pub fn read_severity<R: Reader>(r: &mut R, _cx: DecodeContext) -> Result<Severity> {
    let p = r.read_prefix()?;
    match (p.wire_type, p.tag) {
        (WireType::Enum, 0) => Ok(Severity::Low),
        (WireType::Enum, 1) => Ok(Severity::Medium),
        (WireType::Enum, 2) => Ok(Severity::High),
        (WireType::Enum, 3) => Ok(Severity::Critical),
        (WireType::Enum, t) => Err(Error::UnknownTag(t)),
        (w, _) => Err(Error::BadWireType(w.nibble())),
    }
}

impl WireDefault for Severity {
    fn wire_default() -> Option<Severity> {
        Some(Severity::Low)
    }
}

/// `type shape = Dot | Circle float | Rect float * float`
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    Dot,
    Circle(f64),
    Rect(f64, f64),
}

pub fn write_shape(w: &mut Writer<'_>, v: &Shape) -> Result<()> {
    match v {
        Shape::Dot => w.write_enum(0),
        Shape::Circle(radius) => w.write_tuple(1, 1, |w| w.write_float(0, *radius)),
        Shape::Rect(width, height) => w.write_tuple(2, 2, |w| {
            w.write_float(0, *width)?;
            w.write_float(0, *height)
        }),
    }
}

pub fn read_shape<R: Reader>(r: &mut R, cx: DecodeContext) -> Result<Shape> {
    let p = r.read_prefix()?;
    match (p.wire_type, p.tag) {
        (WireType::Enum, 0) => Ok(Shape::Dot),
        (WireType::Tuple, 1) => {
            let mut t = TupleReader::begin(r, cx)?;
            let radius = match t.element(decode::read_float)? {
                Some(v) => v,
                None => default_or_missing::<f64>("shape.circle.radius")?,
            };
            t.finish()?;
            Ok(Shape::Circle(radius))
        }
        (WireType::Tuple, 2) => {
            let mut t = TupleReader::begin(r, cx)?;
            let width = match t.element(decode::read_float)? {
                Some(v) => v,
                None => default_or_missing::<f64>("shape.rect.width")?,
            };
            let height = match t.element(decode::read_float)? {
                Some(v) => v,
                None => default_or_missing::<f64>("shape.rect.height")?,
            };
            t.finish()?;
            Ok(Shape::Rect(width, height))
        }
        (WireType::Enum, t) | (WireType::Tuple, t) => Err(Error::UnknownTag(t)),
        (w, _) => Err(Error::BadWireType(w.nibble())),
    }
}

/// An authentication tag has no meaningful default: it must be on the wire
#[derive(Debug, Clone, PartialEq)]
pub struct AuthTag(pub Vec<u8>);

impl WireDefault for AuthTag {
    fn wire_default() -> Option<AuthTag> {
        None
    }
}

/// `message signed = { body : string; tag : auth_tag }`
#[derive(Debug, Clone, PartialEq)]
pub struct Signed {
    pub body: String,
    pub tag: AuthTag,
}

impl MessageWrite for Signed {
    fn write_message(&self, w: &mut Writer<'_>) -> Result<()> {
        w.write_tuple(0, 2, |w| {
            w.write_string(0, &self.body)?;
            w.write_bytes(0, &self.tag.0)
        })
    }
}

impl MessageRead for Signed {
    fn read_message<R: Reader>(r: &mut R, cx: DecodeContext) -> Result<Signed> {
        let p = r.read_prefix()?;
        match p.wire_type {
            WireType::Tuple => {
                let mut t = TupleReader::begin(r, cx)?;
                let body = match t.element(decode::read_string)? {
                    Some(v) => v,
                    None => default_or_missing::<String>("signed.body")?,
                };
                let tag = match t.element(|r, cx| decode::read_bytes(r, cx).map(AuthTag))? {
                    Some(v) => v,
                    None => default_or_missing::<AuthTag>("signed.tag")?,
                };
                t.finish()?;
                Ok(Signed { body, tag })
            }
            // an absent value cannot be defaulted: the tag must be on the wire
            WireType::Enum => Err(Error::MissingFieldNoDefault("signed.tag")),
            w => Err(Error::BadWireType(w.nibble())),
        }
    }
}

/// `type dim = int` after promotion to `(int * variance)`
/// with `type variance = Unknown | Known int`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dim {
    pub value: i32,
    pub variance: Variance,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variance {
    Unknown,
    Known(i32),
}

/// The pre-promotion writer: a plain `int` on the wire
pub fn write_dim_v1(w: &mut Writer<'_>, value: &i32) -> Result<()> {
    w.write_int(0, *value)
}

pub fn write_dim(w: &mut Writer<'_>, d: &Dim) -> Result<()> {
    w.write_tuple(0, 2, |w| {
        w.write_int(0, d.value)?;
        write_variance(w, &d.variance)
    })
}

fn write_variance(w: &mut Writer<'_>, v: &Variance) -> Result<()> {
    match v {
        Variance::Unknown => w.write_enum(0),
        Variance::Known(n) => w.write_tuple(1, 1, |w| w.write_int(0, *n)),
    }
}

/// The post-promotion reader: accepts both the tuple form and old int-wire data
pub fn read_dim<R: Reader>(r: &mut R, cx: DecodeContext) -> Result<Dim> {
    let p = r.read_prefix()?;
    match p.wire_type {
        WireType::Tuple => {
            let mut t = TupleReader::begin(r, cx)?;
            let value = match t.element(decode::read_int)? {
                Some(v) => v,
                None => default_or_missing::<i32>("dim.value")?,
            };
            let variance = t.element(read_variance)?.unwrap_or(Variance::Unknown);
            t.finish()?;
            Ok(Dim { value, variance })
        }
        _ => {
            let value = decode::read_int_with(r, p, cx)?;
            Ok(Dim {
                value,
                variance: Variance::Unknown,
            })
        }
    }
}

fn read_variance<R: Reader>(r: &mut R, cx: DecodeContext) -> Result<Variance> {
    let p = r.read_prefix()?;
    match (p.wire_type, p.tag) {
        (WireType::Enum, 0) => Ok(Variance::Unknown),
        (WireType::Tuple, 1) => {
            let mut t = TupleReader::begin(r, cx)?;
            let n = match t.element(decode::read_int)? {
                Some(v) => v,
                None => default_or_missing::<i32>("variance.known")?,
            };
            t.finish()?;
            Ok(Variance::Known(n))
        }
        (WireType::Enum, t) | (WireType::Tuple, t) => Err(Error::UnknownTag(t)),
        (w, _) => Err(Error::BadWireType(w.nibble())),
    }
}

/// `message batch = { id : int; samples : [ sample ] }`
#[derive(Debug, Clone, PartialEq)]
pub struct Batch {
    pub id: i32,
    pub samples: Vec<Sample>,
}

impl MessageWrite for Batch {
    fn write_message(&self, w: &mut Writer<'_>) -> Result<()> {
        w.write_tuple(0, 2, |w| {
            w.write_int(0, self.id)?;
            w.write_htuple(0, self.samples.len() as u64, |w| {
                for s in &self.samples {
                    s.write_message(w)?;
                }
                Ok(())
            })
        })
    }
}

impl MessageRead for Batch {
    fn read_message<R: Reader>(r: &mut R, cx: DecodeContext) -> Result<Batch> {
        let p = r.read_prefix()?;
        match p.wire_type {
            WireType::Tuple => {
                let mut t = TupleReader::begin(r, cx)?;
                let id = match t.element(decode::read_int)? {
                    Some(v) => v,
                    None => default_or_missing::<i32>("batch.id")?,
                };
                let samples = t
                    .element(|r, cx| decode::read_htuple(r, cx, Sample::read_message))?
                    .unwrap_or_default();
                t.finish()?;
                Ok(Batch { id, samples })
            }
            w => Err(Error::BadWireType(w.nibble())),
        }
    }
}

// Versioned wire schemas of `sample`, the shape a codec table is built from.
// Version 0 predates the `label` field.

pub fn write_sample_v0(w: &mut Writer<'_>, x: &Sample) -> Result<()> {
    w.write_tuple(0, 1, |w| w.write_int(0, x.seq))
}

pub fn write_sample_v1(w: &mut Writer<'_>, x: &Sample) -> Result<()> {
    x.write_message(w)
}

pub fn read_sample(r: &mut StringReader<'_>, cx: DecodeContext) -> Result<Sample> {
    Sample::read_message(r, cx)
}
