//! Grid enumeration
//!
//! [`CartesianProduct`] walks mixed-radix coordinates for any number of axes
//! with the last axis varying fastest. [`GridEnumerator`] maps each
//! coordinate to a [`ParameterSet`] and profiles it.

use crate::profiler::ProfileSampler;
use codecsweep_codecs::CodecAdapter;
use codecsweep_types::{CodecFamily, CompressionResult, Error, ParameterSet, ParameterSpace, Result};
use std::any::Any;
use std::iter::{Enumerate, FusedIterator};
use std::panic::{self, AssertUnwindSafe};

/// Mixed-radix odometer over axis lengths
///
/// Zero axes yield exactly one empty coordinate; any zero-length axis yields
/// nothing.
#[derive(Debug, Clone)]
pub struct CartesianProduct {
    radices: Vec<usize>,
    next: Option<Vec<usize>>,
    remaining: usize,
}

impl CartesianProduct {
    /// Create an odometer over `radices`, outermost first
    pub fn new(radices: Vec<usize>) -> Self {
        let remaining = radices.iter().product();
        let next = (remaining > 0).then(|| vec![0; radices.len()]);
        Self {
            radices,
            next,
            remaining,
        }
    }
}

impl Iterator for CartesianProduct {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next.take()?;
        let mut successor = current.clone();
        for axis in (0..successor.len()).rev() {
            successor[axis] += 1;
            if successor[axis] < self.radices[axis] {
                self.next = Some(successor);
                break;
            }
            successor[axis] = 0;
        }
        self.remaining -= 1;
        Some(current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for CartesianProduct {}

impl FusedIterator for CartesianProduct {}

/// One enumerated grid point and its outcome
#[derive(Debug, Clone, PartialEq)]
pub struct GridPoint {
    /// Position in grid order
    pub index: usize,
    /// Parameters of the point
    pub params: ParameterSet,
    /// Measured result, or why the point failed
    pub outcome: Result<CompressionResult>,
}

/// Reject a space that cannot be swept with an adapter of `family`
pub fn check_space(space: &ParameterSpace, family: CodecFamily) -> Result<()> {
    if space.family() != family {
        return Err(Error::config(format!(
            "cannot sweep a {} parameter space with the {} codec",
            space.family(),
            family
        )));
    }
    if space.is_empty() {
        return Err(Error::config(format!("the {} parameter space is empty", family)));
    }
    Ok(())
}

pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| (*s).to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "non-string panic payload".to_string())
}

/// Sample one point, turning a codec panic into a point failure
pub(crate) fn sample_point(
    adapter: &dyn CodecAdapter,
    data: &[u8],
    params: ParameterSet,
) -> Result<CompressionResult> {
    let sampler = ProfileSampler::new(adapter);
    panic::catch_unwind(AssertUnwindSafe(|| sampler.sample(data, params)))
        .unwrap_or_else(|payload| Err(Error::panicked(params, panic_message(payload.as_ref()))))
}

/// Lazy, single-pass walk over a parameter space
///
/// Points are produced in lexicographic axis order and profiled as they are
/// pulled. A failing point is yielded with its error and enumeration
/// continues.
pub struct GridEnumerator<'a> {
    space: &'a ParameterSpace,
    adapter: &'a dyn CodecAdapter,
    data: &'a [u8],
    coords: Enumerate<CartesianProduct>,
}

impl<'a> GridEnumerator<'a> {
    /// Create an enumerator; the space must be non-empty and match the adapter
    pub fn new(
        space: &'a ParameterSpace,
        adapter: &'a dyn CodecAdapter,
        data: &'a [u8],
    ) -> Result<Self> {
        check_space(space, adapter.family())?;
        Ok(Self {
            space,
            adapter,
            data,
            coords: CartesianProduct::new(space.radices()).enumerate(),
        })
    }

    /// Space being enumerated
    pub fn space(&self) -> &ParameterSpace {
        self.space
    }
}

impl Iterator for GridEnumerator<'_> {
    type Item = GridPoint;

    fn next(&mut self) -> Option<Self::Item> {
        let (index, coords) = self.coords.next()?;
        let params = self.space.params_at(&coords);
        let outcome = sample_point(self.adapter, self.data, params);
        Some(GridPoint {
            index,
            params,
            outcome,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.coords.size_hint()
    }
}

impl ExactSizeIterator for GridEnumerator<'_> {}

impl FusedIterator for GridEnumerator<'_> {}
