// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

//! Range-based point cloud preprocessing.
//!
//! Sensors report spurious returns very close to the emitter and noisy ones
//! near the edge of their rated range. [`RangeFilter`] drops points whose
//! Euclidean distance from the sensor origin falls outside a configured
//! [`RangeBand`], preserving relative point order.
//!
//! Running the pipeline unfiltered is an expected configuration, so
//! [`RangeFilter::Passthrough`] is a first-class variant: downstream code
//! applies the filter unconditionally instead of branching on an optional
//! component.

use crate::lidar::{Error, Frame, PointCloud};

/// Inclusive distance interval from the sensor origin, in sensor-native
/// units.
///
/// Validated once at construction; applying a band never fails.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RangeBand {
    min_range: f32,
    max_range: f32,
}

impl RangeBand {
    /// Create a range band, validating `0 <= min <= max`.
    pub fn new(min_range: f32, max_range: f32) -> Result<Self, Error> {
        // NaN bounds fail both comparisons below and are rejected here too.
        if !(min_range >= 0.0 && min_range <= max_range) {
            return Err(Error::MalformedRangeBand {
                min: min_range,
                max: max_range,
            });
        }
        Ok(Self {
            min_range,
            max_range,
        })
    }

    /// Lower bound of the band
    pub fn min_range(&self) -> f32 {
        self.min_range
    }

    /// Upper bound of the band
    pub fn max_range(&self) -> f32 {
        self.max_range
    }

    /// Check whether the band admits every possible range
    pub fn is_unbounded(&self) -> bool {
        self.min_range == 0.0 && self.max_range == f32::INFINITY
    }

    /// Check whether `range` falls inside the band (inclusive)
    #[inline]
    pub fn contains(&self, range: f32) -> bool {
        (self.min_range..=self.max_range).contains(&range)
    }
}

/// Stateless range filter over point clouds.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RangeFilter {
    /// Identity transform: every point passes
    Passthrough,
    /// Keep only points whose distance from the origin is inside the band
    Band(RangeBand),
}

impl RangeFilter {
    /// Build a filter from an optional band.
    ///
    /// `None` and the unbounded band `[0, +inf]` both map to
    /// [`Self::Passthrough`], so a disabled filter behaves as the identity
    /// transform element-for-element.
    pub fn new(band: Option<RangeBand>) -> Self {
        match band {
            Some(band) if !band.is_unbounded() => Self::Band(band),
            _ => Self::Passthrough,
        }
    }

    /// Filter a point cloud, preserving relative point order.
    pub fn apply(&self, points: &PointCloud) -> PointCloud {
        match self {
            Self::Passthrough => points.clone(),
            Self::Band(band) => {
                let mut kept = PointCloud::with_capacity(points.len());
                for i in 0..points.len() {
                    if band.contains(points.norm(i)) {
                        kept.push(points.x[i], points.y[i], points.z[i]);
                    }
                }
                kept
            }
        }
    }

    /// Filter a frame, keeping the timestamp channel aligned with the
    /// surviving points.
    pub fn apply_frame(&self, frame: &Frame) -> Frame {
        match self {
            Self::Passthrough => frame.clone(),
            Self::Band(band) => {
                let points = &frame.points;
                let mut kept = PointCloud::with_capacity(points.len());
                let mut timestamps = Vec::with_capacity(frame.timestamps.len());
                for i in 0..points.len() {
                    if band.contains(points.norm(i)) {
                        kept.push(points.x[i], points.y[i], points.z[i]);
                        timestamps.push(frame.timestamps[i]);
                    }
                }
                Frame {
                    index: frame.index,
                    device_timestamp: frame.device_timestamp,
                    points: kept,
                    timestamps,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cloud_at_distances(distances: &[f32]) -> PointCloud {
        let mut cloud = PointCloud::with_capacity(distances.len());
        for &d in distances {
            cloud.push(d, 0.0, 0.0);
        }
        cloud
    }

    #[test]
    fn test_band_validation() {
        assert!(RangeBand::new(0.0, 100.0).is_ok());
        assert!(RangeBand::new(5.0, 5.0).is_ok());
        assert!(RangeBand::new(0.0, f32::INFINITY).is_ok());

        assert!(matches!(
            RangeBand::new(50.0, 5.0).unwrap_err(),
            Error::MalformedRangeBand { min, max } if min == 50.0 && max == 5.0
        ));
        assert!(RangeBand::new(-1.0, 5.0).is_err());
        assert!(RangeBand::new(f32::NAN, 5.0).is_err());
        assert!(RangeBand::new(0.0, f32::NAN).is_err());
    }

    #[test]
    fn test_band_filtering_is_inclusive() {
        let band = RangeBand::new(5.0, 50.0).unwrap();
        let filter = RangeFilter::new(Some(band));

        let cloud = cloud_at_distances(&[1.0, 5.0, 25.0, 50.0, 60.0]);
        let kept = filter.apply(&cloud);

        assert_eq!(kept.x, vec![5.0, 25.0, 50.0]);
    }

    #[test]
    fn test_passthrough_is_identity() {
        let filter = RangeFilter::new(None);
        assert_eq!(filter, RangeFilter::Passthrough);

        let cloud = cloud_at_distances(&[0.5, 3.0, 1000.0]);
        assert_eq!(filter.apply(&cloud), cloud);
    }

    #[test]
    fn test_unbounded_band_collapses_to_passthrough() {
        let band = RangeBand::new(0.0, f32::INFINITY).unwrap();
        assert_eq!(RangeFilter::new(Some(band)), RangeFilter::Passthrough);
    }

    #[test]
    fn test_order_preserved() {
        let band = RangeBand::new(1.0, 10.0).unwrap();
        let filter = RangeFilter::new(Some(band));

        let cloud = cloud_at_distances(&[9.0, 0.1, 2.0, 20.0, 4.0]);
        let kept = filter.apply(&cloud);
        assert_eq!(kept.x, vec![9.0, 2.0, 4.0]);
    }

    #[test]
    fn test_norm_uses_all_axes() {
        let band = RangeBand::new(4.9, 5.1).unwrap();
        let filter = RangeFilter::new(Some(band));

        let mut cloud = PointCloud::empty();
        cloud.push(3.0, 4.0, 0.0); // norm 5
        cloud.push(3.0, 0.0, 0.0); // norm 3
        cloud.push(0.0, 3.0, 4.0); // norm 5

        let kept = filter.apply(&cloud);
        assert_eq!(kept.len(), 2);
    }

    #[test]
    fn test_apply_frame_keeps_channels_aligned() {
        let band = RangeBand::new(2.0, 10.0).unwrap();
        let filter = RangeFilter::new(Some(band));

        let frame = Frame {
            index: 0,
            device_timestamp: 12.5,
            points: cloud_at_distances(&[1.0, 3.0, 5.0, 20.0]),
            timestamps: vec![0.0, 0.25, 0.5, 1.0],
        };

        let filtered = filter.apply_frame(&frame);
        assert_eq!(filtered.points.x, vec![3.0, 5.0]);
        assert_eq!(filtered.timestamps, vec![0.25, 0.5]);
        assert_eq!(filtered.len(), filtered.timestamps.len());
        assert_eq!(filtered.device_timestamp, 12.5);
    }
}
