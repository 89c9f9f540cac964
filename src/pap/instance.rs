//! PAP instance data and its text loader.
//!
//! The text format is line oriented:
//!
//! ```raw
//! P: <professors>
//! D: <disciplines>
//! T: <periods>
//! S: <rooms per period>
//! H: <max periods per professor>
//! hd:
//! <required periods of discipline 0>
//! ...
//! apd:
//! <preference of professor 0 for each discipline>
//! ...
//! rpt:
//! <availability of professor 0 in each period>
//! ...
//! ```
//!
//! Header lines are read by their last token, so the label may be any
//! text. Each section starts with one label line, then its values are
//! taken as whitespace-separated tokens across as many lines as needed.
//! Blank lines and anything after `#` are ignored.

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;
use std::str::FromStr;

use crate::error::InstanceError;

/// Upper bound on values reserved before a section is read.
const PREALLOC_LIMIT: usize = 4096;

/// Sizing parameters of a PAP instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PapDimensions {
    /// `P`
    pub professors: usize,
    /// `D`
    pub disciplines: usize,
    /// `T`
    pub periods: usize,
    /// `S`: classes that can run in the same period.
    pub rooms: usize,
    /// `H`: periods a single professor may teach in total.
    pub max_load: usize,
}

impl PapDimensions {
    fn check(&self) -> Result<(), InstanceError> {
        if self.professors == 0 {
            return Err(InstanceError::EmptyDimension("professors"));
        }
        if self.disciplines == 0 {
            return Err(InstanceError::EmptyDimension("disciplines"));
        }
        if self.periods == 0 {
            return Err(InstanceError::EmptyDimension("periods"));
        }
        if self.professors.checked_mul(self.disciplines).is_none() {
            return Err(InstanceError::Overflow("apd"));
        }
        if self.professors.checked_mul(self.periods).is_none() {
            return Err(InstanceError::Overflow("rpt"));
        }
        Ok(())
    }
}

/// Validated, immutable PAP data.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawPapInstance"))]
pub struct PapInstance {
    dims: PapDimensions,
    /// `hd[d]`
    required: Vec<usize>,
    /// `apd[p][d]`, row-major `P x D`.
    preference: Vec<f64>,
    /// `rpt[p][t]`, row-major `P x T`.
    availability: Vec<u32>,
}

impl PapInstance {
    /// Builds an instance from its parts.
    ///
    /// # Errors
    ///
    /// Fails if `P`, `D` or `T` is zero, if `P x D` or `P x T` overflows,
    /// if a vector or matrix does not match the declared sizes, or if a
    /// preference is not finite.
    pub fn new(
        dims: PapDimensions,
        required: Vec<usize>,
        preference: Vec<Vec<f64>>,
        availability: Vec<Vec<u32>>,
    ) -> Result<Self, InstanceError> {
        dims.check()?;
        let PapDimensions {
            professors,
            disciplines,
            periods,
            ..
        } = dims;

        if required.len() != disciplines {
            return Err(InstanceError::DimensionMismatch {
                what: "hd",
                expected: disciplines,
                actual: required.len(),
            });
        }

        let preference = flatten("apd", preference, professors, disciplines)?;
        if let Some(i) = preference.iter().position(|v| !v.is_finite()) {
            return Err(InstanceError::NonFinite {
                what: "apd",
                row: i / disciplines,
                col: i % disciplines,
            });
        }
        let availability = flatten("rpt", availability, professors, periods)?;

        Ok(Self {
            dims,
            required,
            preference,
            availability,
        })
    }

    /// Parses an instance from text.
    pub fn parse(input: &str) -> Result<Self, InstanceError> {
        Self::from_bufread(input.as_bytes())
    }

    /// Loads an instance from a type implementing `BufRead`.
    pub fn from_bufread<R: BufRead>(rdr: R) -> Result<Self, InstanceError> {
        let mut sc = LineScanner::new(rdr);

        let dims = PapDimensions {
            professors: sc.header("P")?,
            disciplines: sc.header("D")?,
            periods: sc.header("T")?,
            rooms: sc.header("S")?,
            max_load: sc.header("H")?,
        };
        dims.check()?;

        let required = sc.section("hd", dims.disciplines)?;
        let preference = sc.section("apd", dims.professors * dims.disciplines)?;
        let availability = sc.section("rpt", dims.professors * dims.periods)?;

        Self::new(
            dims,
            required,
            rows(preference, dims.disciplines),
            rows(availability, dims.periods),
        )
    }

    /// Loads an instance from a generic reader.
    pub fn from_reader<R: Read>(r: R) -> Result<Self, InstanceError> {
        Self::from_bufread(BufReader::new(r))
    }

    /// Loads an instance from a file path.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, InstanceError> {
        let file = File::open(path)?;
        Self::from_bufread(BufReader::new(file))
    }

    #[inline]
    pub fn dimensions(&self) -> PapDimensions {
        self.dims
    }

    /// Periods discipline `d` needs each week.
    #[inline]
    pub fn required_periods(&self, d: usize) -> usize {
        self.required[d]
    }

    /// Preference of professor `p` for discipline `d`.
    #[inline]
    pub fn preference(&self, p: usize, d: usize) -> f64 {
        self.preference[p * self.dims.disciplines + d]
    }

    /// Classes professor `p` may teach in period `t`.
    #[inline]
    pub fn availability(&self, p: usize, t: usize) -> u32 {
        self.availability[p * self.dims.periods + t]
    }

    #[inline]
    pub fn is_available(&self, p: usize, t: usize) -> bool {
        self.availability(p, t) > 0
    }
}

/// Serialized shape of [`PapInstance`], checked by [`PapInstance::new`] on
/// the way in.
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RawPapInstance {
    dims: PapDimensions,
    required: Vec<usize>,
    preference: Vec<f64>,
    availability: Vec<u32>,
}

#[cfg(feature = "serde")]
impl TryFrom<RawPapInstance> for PapInstance {
    type Error = InstanceError;

    fn try_from(raw: RawPapInstance) -> Result<Self, Self::Error> {
        let dims = raw.dims;
        dims.check()?;
        let expect_len = |what: &'static str, actual: usize, cols: usize| {
            let expected = dims.professors * cols;
            if actual == expected {
                Ok(())
            } else {
                Err(InstanceError::DimensionMismatch {
                    what,
                    expected,
                    actual,
                })
            }
        };
        expect_len("apd", raw.preference.len(), dims.disciplines)?;
        expect_len("rpt", raw.availability.len(), dims.periods)?;
        Self::new(
            dims,
            raw.required,
            rows(raw.preference, dims.disciplines),
            rows(raw.availability, dims.periods),
        )
    }
}

impl FromStr for PapInstance {
    type Err = InstanceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

fn flatten<T>(
    what: &'static str,
    matrix: Vec<Vec<T>>,
    rows: usize,
    cols: usize,
) -> Result<Vec<T>, InstanceError> {
    if matrix.len() != rows {
        return Err(InstanceError::DimensionMismatch {
            what,
            expected: rows,
            actual: matrix.len(),
        });
    }
    if let Some(row) = matrix.iter().find(|row| row.len() != cols) {
        return Err(InstanceError::DimensionMismatch {
            what,
            expected: cols,
            actual: row.len(),
        });
    }
    Ok(matrix.into_iter().flatten().collect())
}

fn rows<T: Clone>(flat: Vec<T>, cols: usize) -> Vec<Vec<T>> {
    flat.chunks(cols).map(<[T]>::to_vec).collect()
}

/// Reads non-blank, comment-stripped lines from a reader.
struct LineScanner<R> {
    rdr: R,
    buf: String,
}

impl<R: BufRead> LineScanner<R> {
    fn new(rdr: R) -> Self {
        Self {
            rdr,
            buf: String::new(),
        }
    }

    /// Advances to the next line with content and returns it trimmed.
    fn next_line(&mut self, expected: &'static str) -> Result<&str, InstanceError> {
        loop {
            self.buf.clear();
            if self.rdr.read_line(&mut self.buf)? == 0 {
                return Err(InstanceError::UnexpectedEof { expected });
            }
            if !content(&self.buf).is_empty() {
                break;
            }
        }
        Ok(content(&self.buf))
    }

    /// Reads a `label value` line and parses its last token.
    fn header<T: FromStr>(&mut self, expected: &'static str) -> Result<T, InstanceError> {
        let line = self.next_line(expected)?;
        let token = line.split_whitespace().next_back().unwrap_or(line);
        parse_token(token, expected)
    }

    /// Skips a section label line, then reads exactly `count` values.
    fn section<T: FromStr>(
        &mut self,
        expected: &'static str,
        count: usize,
    ) -> Result<Vec<T>, InstanceError> {
        self.next_line(expected)?;

        let mut values = Vec::with_capacity(count.min(PREALLOC_LIMIT));
        while values.len() < count {
            let line = self.next_line(expected)?;
            let tokens: Vec<&str> = line.split_whitespace().collect();
            if values.len() + tokens.len() > count {
                return Err(InstanceError::DimensionMismatch {
                    what: expected,
                    expected: count,
                    actual: values.len() + tokens.len(),
                });
            }
            for token in tokens {
                values.push(parse_token(token, expected)?);
            }
        }
        Ok(values)
    }
}

/// A line without its comment and surrounding whitespace.
fn content(line: &str) -> &str {
    line.split('#').next().unwrap_or("").trim()
}

fn parse_token<T: FromStr>(token: &str, expected: &'static str) -> Result<T, InstanceError> {
    token.parse().map_err(|_| InstanceError::Parse {
        token: token.to_owned(),
        expected,
    })
}
