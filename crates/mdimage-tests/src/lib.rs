//! Integration tests for mdimage crates.
//!
//! This crate exercises the public `Image` value end to end: sharing and
//! copy-on-write, geometry, typed access, interpolation and metadata.

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use mdimage_core::prelude::*;
    use mdimage_core::{MAX_LABEL_DIMENSION, MIN_DIMENSION, PixelRegistry};
    use num_complex::Complex;

    fn ramp_2d(width: u32, height: u32) -> Image {
        let data: Vec<f32> = (0..width * height).map(|v| v as f32).collect();
        Image::from_vec(&[width, height], PixelId::Float32, 0, data).unwrap()
    }

    #[test]
    fn test_int16_round_trip_and_copy_isolation() {
        let mut image = Image::new(&[4, 3], PixelId::Int16).unwrap();
        image.set_pixel_as_int16(&[1, 1], 7).unwrap();
        assert_eq!(image.get_pixel_as_int16(&[1, 1]).unwrap(), 7);

        for y in 0..3 {
            for x in 0..4 {
                if (x, y) != (1, 1) {
                    assert_eq!(image.get_pixel_as_int16(&[x, y]).unwrap(), 0);
                }
            }
        }

        let mut copy = image.clone();
        copy.set_pixel_as_int16(&[3, 2], -5).unwrap();
        assert_eq!(copy.get_pixel_as_int16(&[3, 2]).unwrap(), -5);
        assert_eq!(copy.get_pixel_as_int16(&[1, 1]).unwrap(), 7);
        assert_eq!(image.get_pixel_as_int16(&[3, 2]).unwrap(), 0);
    }

    #[test]
    fn test_rejects_unsupported_size_length() {
        let err = Image::new(&[4, 3, 2, 2, 2, 2], PixelId::UInt8).unwrap_err();
        assert!(err.is_allocation_error());
        let err = Image::new(&[4], PixelId::UInt8).unwrap_err();
        assert!(err.is_allocation_error());

        // three values for a 2-D buffer is a mismatch, never a truncation
        let err = Image::from_vec(&[2, 2], PixelId::UInt8, 0, vec![1u8, 2, 3]).unwrap_err();
        assert!(err.is_allocation_error());
    }

    #[test]
    fn test_rejects_mismatched_geometry_lengths() {
        let mut image = Image::new(&[4, 3], PixelId::Float64).unwrap();
        assert!(image.set_origin(&[1.0, 2.0, 3.0]).unwrap_err().is_shape_error());
        assert!(image.set_spacing(&[1.0]).unwrap_err().is_shape_error());
        assert!(image.set_direction(&[1.0, 0.0, 0.0]).unwrap_err().is_shape_error());
        assert_eq!(image.origin().unwrap(), &[0.0, 0.0]);
    }

    #[test]
    fn test_mutation_detaches_shared_image() {
        let mut a = ramp_2d(8, 8);
        let b = a.clone();
        assert!(a.shares_data_with(&b));
        assert!(!a.is_unique().unwrap());

        a.set_pixel_as_float32(&[0, 0], 100.0).unwrap();

        assert!(!a.shares_data_with(&b));
        assert!(a.is_unique().unwrap());
        assert!(b.is_unique().unwrap());
        assert_eq!(b.get_pixel_as_float32(&[0, 0]).unwrap(), 0.0);
        assert_eq!(a.get_pixel_as_float32(&[0, 0]).unwrap(), 100.0);
    }

    #[test]
    fn test_every_mutation_detaches() {
        let base = ramp_2d(4, 4);

        let mut image = base.clone();
        image.set_origin(&[1.0, 1.0]).unwrap();
        assert!(!image.shares_data_with(&base));
        assert_eq!(base.origin().unwrap(), &[0.0, 0.0]);

        let mut image = base.clone();
        image.set_metadata("k", "v").unwrap();
        assert!(!image.shares_data_with(&base));
        assert!(!base.has_metadata_key("k").unwrap());

        let mut image = base.clone();
        image.get_buffer_as_float32_mut().unwrap()[0] = 42.0;
        assert!(!image.shares_data_with(&base));
        assert_eq!(base.get_buffer_as_float32().unwrap()[0], 0.0);

        let mut image = base.clone();
        image.make_unique().unwrap();
        assert!(!image.shares_data_with(&base));
    }

    #[test]
    fn test_failed_mutation_keeps_sharing() {
        let base = ramp_2d(4, 4);
        let mut image = base.clone();

        assert!(image.set_pixel_as_float32(&[9, 9], 1.0).unwrap_err().is_bounds_error());
        assert!(image.set_pixel_as_int16(&[0, 0], 1).unwrap_err().is_type_error());
        assert!(image.get_buffer_as_uint8_mut().unwrap_err().is_type_error());
        assert!(image.set_spacing(&[0.0, 1.0]).is_err());
        assert!(!image.erase_metadata("missing").unwrap());

        assert!(image.shares_data_with(&base));
    }

    #[test]
    fn test_moved_from_fails_safely() {
        let mut a = ramp_2d(2, 2);
        let b = a.take();
        assert!(a.is_moved_from());
        assert!(matches!(a.pixel_id(), Err(Error::MovedFrom { .. })));
        assert!(matches!(
            a.set_pixel_as_float32(&[0, 0], 1.0),
            Err(Error::MovedFrom { .. })
        ));
        assert_eq!(b.get_pixel_as_float32(&[1, 1]).unwrap(), 3.0);

        // reassignment revives the handle
        a = b.clone();
        assert_eq!(a.size().unwrap(), &[2, 2]);
    }

    #[test]
    fn test_geometry_round_trip() {
        let mut image = Image::new(&[10, 10, 5], PixelId::UInt16).unwrap();
        image.set_origin(&[-10.0, 5.0, 2.5]).unwrap();
        image.set_spacing(&[0.5, 0.5, 2.0]).unwrap();
        // 90 degree rotation about z
        image
            .set_direction(&[0.0, -1.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0])
            .unwrap();

        let point = image.transform_index_to_physical_point(&[2, 4, 1]).unwrap();
        assert_relative_eq!(point[0], -12.0, epsilon = 1e-12);
        assert_relative_eq!(point[1], 6.0, epsilon = 1e-12);
        assert_relative_eq!(point[2], 4.5, epsilon = 1e-12);

        let index = image.transform_physical_point_to_index(&point).unwrap();
        assert_eq!(index, vec![2, 4, 1]);

        let continuous = [1.25, 3.75, 0.5];
        let point = image
            .transform_continuous_index_to_physical_point(&continuous)
            .unwrap();
        let back = image.transform_physical_point_to_continuous_index(&point).unwrap();
        for (a, b) in continuous.iter().zip(&back) {
            assert_relative_eq!(*a, *b, epsilon = 1e-10);
        }
    }

    #[test]
    fn test_singular_direction_fails_on_inverse() {
        let mut image = Image::new(&[4, 4], PixelId::Float32).unwrap();
        image.set_direction(&[1.0, 0.0, 1.0, 0.0]).unwrap();
        // forward mapping still works
        assert!(image.transform_index_to_physical_point(&[1, 1]).is_ok());
        let err = image
            .transform_physical_point_to_continuous_index(&[1.0, 1.0])
            .unwrap_err();
        assert!(matches!(err, Error::InvalidGeometry { .. }));
    }

    #[test]
    fn test_copy_information() {
        let mut src = Image::new(&[4, 3], PixelId::UInt8).unwrap();
        src.set_origin(&[1.0, 2.0]).unwrap();
        src.set_spacing(&[0.25, 4.0]).unwrap();
        src.set_metadata("modality", "MR").unwrap();

        let mut dst = Image::new(&[4, 3], PixelId::VectorFloat64).unwrap();
        dst.copy_information(&src).unwrap();
        assert_eq!(dst.origin().unwrap(), &[1.0, 2.0]);
        assert_eq!(dst.spacing().unwrap(), &[0.25, 4.0]);
        assert!(!dst.has_metadata_key("modality").unwrap());

        let mut other = Image::new(&[4, 4], PixelId::UInt8).unwrap();
        assert!(matches!(
            other.copy_information(&src),
            Err(Error::SizeMismatch { .. })
        ));
        let mut other = Image::new(&[4, 3, 1], PixelId::UInt8).unwrap();
        assert!(matches!(
            other.copy_information(&src),
            Err(Error::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_typed_access_never_reinterprets() {
        let scalar = Image::new(&[2, 2], PixelId::Float32).unwrap();
        assert!(scalar.get_pixel_as_float64(&[0, 0]).unwrap_err().is_type_error());
        assert!(scalar.get_pixel_as_vector_float32(&[0, 0]).unwrap_err().is_type_error());
        assert!(scalar.get_buffer_as_uint32().unwrap_err().is_type_error());

        let vector = Image::new(&[2, 2], PixelId::VectorFloat32).unwrap();
        assert!(vector.get_pixel_as_float32(&[0, 0]).unwrap_err().is_type_error());
        assert_eq!(vector.get_buffer_as_float32().unwrap().len(), 8);

        let complex = Image::new(&[2, 2], PixelId::ComplexFloat64).unwrap();
        assert!(complex.get_pixel_as_float64(&[0, 0]).unwrap_err().is_type_error());
        assert!(complex.get_pixel_as_complex_float32(&[0, 0]).unwrap_err().is_type_error());

        let err = scalar.get_pixel_as_int8(&[0, 0]).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("get_pixel_as_int8"));
        assert!(message.contains("float32"), "{message}");
    }

    #[test]
    fn test_vector_and_complex_pixels() {
        let mut vector = Image::new(&[3, 3, 3], PixelId::VectorInt32).unwrap();
        assert_eq!(vector.number_of_components_per_pixel().unwrap(), 3);
        vector.set_pixel_as_vector_int32(&[1, 2, 0], &[1, -2, 3]).unwrap();
        assert_eq!(vector.get_pixel_as_vector_int32(&[1, 2, 0]).unwrap(), vec![1, -2, 3]);
        assert!(vector
            .set_pixel_as_vector_int32(&[0, 0, 0], &[1, 2])
            .unwrap_err()
            .is_shape_error());

        let mut complex = Image::new(&[2, 2], PixelId::ComplexFloat32).unwrap();
        complex
            .set_pixel_as_complex_float32(&[1, 0], Complex::new(1.5, -2.0))
            .unwrap();
        assert_eq!(
            complex.get_pixel_as_complex_float32(&[1, 0]).unwrap(),
            Complex::new(1.5, -2.0)
        );
        assert_eq!(complex.pixel_values(&[1, 0]).unwrap(), vec![1.5, -2.0]);
    }

    #[test]
    fn test_evaluate_boundaries() {
        let image = ramp_2d(4, 3);
        let linear = Interpolator::Linear;

        assert!(image.evaluate_at_continuous_index(&[-0.5, 0.0], linear).is_ok());
        assert!(image
            .evaluate_at_continuous_index(&[-0.501, 0.0], linear)
            .unwrap_err()
            .is_bounds_error());
        assert!(image.evaluate_at_continuous_index(&[3.5, 2.5], linear).is_ok());
        assert!(image
            .evaluate_at_continuous_index(&[3.501, 0.0], linear)
            .unwrap_err()
            .is_bounds_error());

        let v = image.evaluate_at_continuous_index(&[1.5, 1.0], linear).unwrap();
        assert_relative_eq!(v[0], 5.5, epsilon = 1e-9);
        let v = image
            .evaluate_at_continuous_index(&[1.4, 0.6], Interpolator::NearestNeighbor)
            .unwrap();
        assert_relative_eq!(v[0], 5.0, epsilon = 1e-9);
    }

    #[test]
    fn test_evaluate_at_physical_point() {
        let mut image = ramp_2d(4, 3);
        image.set_origin(&[10.0, 20.0]).unwrap();
        image.set_spacing(&[2.0, 2.0]).unwrap();

        let v = image
            .evaluate_at_physical_point(&[13.0, 22.0], Interpolator::Linear)
            .unwrap();
        assert_relative_eq!(v[0], 5.5, epsilon = 1e-9);
        assert!(image
            .evaluate_at_physical_point(&[0.0, 0.0], Interpolator::Linear)
            .unwrap_err()
            .is_bounds_error());
    }

    #[test]
    fn test_metadata_semantics() {
        let mut image = Image::new(&[2, 2], PixelId::UInt8).unwrap();
        assert!(image.metadata_keys().unwrap().is_empty());
        assert!(matches!(image.get_metadata("a"), Err(Error::KeyNotFound { .. })));

        image.set_metadata("b", "2").unwrap();
        image.set_metadata("a", "1").unwrap();
        image.set_metadata("a", "one").unwrap();
        assert_eq!(image.metadata_keys().unwrap(), vec!["a", "b"]);
        assert_eq!(image.get_metadata("a").unwrap(), "one");

        let copy = image.clone();
        assert!(image.erase_metadata("a").unwrap());
        assert!(!image.erase_metadata("a").unwrap());
        assert!(!image.has_metadata_key("a").unwrap());
        assert_eq!(copy.get_metadata("a").unwrap(), "one");
    }

    #[test]
    fn test_label_maps() {
        let mut labels = Image::new(&[8, 4, 2], PixelId::LabelUInt16).unwrap();
        labels.set_pixel_as_uint16(&[3, 1, 1], 12).unwrap();
        assert_eq!(labels.get_pixel_as_uint16(&[3, 1, 1]).unwrap(), 12);
        assert_eq!(labels.get_pixel_as_uint16(&[4, 1, 1]).unwrap(), 0);

        assert!(labels.get_buffer_as_uint16().is_err());
        assert!(matches!(
            labels.evaluate_at_continuous_index(&[0.0, 0.0, 0.0], Interpolator::NearestNeighbor),
            Err(Error::UnsupportedOperation { .. })
        ));
        assert!(Image::new(&[2, 2, 2, 2, 2], PixelId::LabelUInt8)
            .unwrap_err()
            .is_configuration_error());

        let dense = labels.cast(PixelId::UInt16).unwrap();
        assert_eq!(dense.get_buffer_as_uint16().unwrap().iter().filter(|&&v| v != 0).count(), 1);
        assert_eq!(dense.get_pixel_as_uint16(&[3, 1, 1]).unwrap(), 12);
    }

    #[test]
    fn test_cast_keeps_geometry_and_metadata() {
        let mut image = ramp_2d(3, 2);
        image.set_spacing(&[0.5, 0.75]).unwrap();
        image.set_metadata("unit", "mm").unwrap();

        let bytes = image.cast(PixelId::UInt8).unwrap();
        assert_eq!(bytes.get_buffer_as_uint8().unwrap(), &[0, 1, 2, 3, 4, 5]);
        assert_eq!(bytes.spacing().unwrap(), &[0.5, 0.75]);
        assert_eq!(bytes.get_metadata("unit").unwrap(), "mm");
        assert_eq!(bytes.pixel_id_type_as_string().unwrap(), "8-bit unsigned integer");
    }

    #[test]
    fn test_label_cast_wraps_like_dense_cast() {
        let image = Image::from_vec(&[3, 1], PixelId::Int16, 0, vec![300i16, -1, 5]).unwrap();
        let dense = image.cast(PixelId::UInt8).unwrap();
        let labels = image.cast(PixelId::LabelUInt8).unwrap();
        for x in 0..3 {
            assert_eq!(
                labels.get_pixel_as_uint8(&[x, 0]).unwrap(),
                dense.get_pixel_as_uint8(&[x, 0]).unwrap()
            );
        }
        assert_eq!(dense.get_buffer_as_uint8().unwrap(), &[44, 255, 5]);
    }

    #[test]
    fn test_wide_label_round_trip() {
        let wide = (1u64 << 60) + 1;
        let mut labels = Image::new(&[2, 2], PixelId::LabelUInt64).unwrap();
        labels.set_pixel_as_uint64(&[1, 1], wide).unwrap();

        let dense = labels.cast(PixelId::UInt64).unwrap();
        assert_eq!(dense.get_pixel_as_uint64(&[1, 1]).unwrap(), wide);
        let back = dense.cast(PixelId::LabelUInt64).unwrap();
        assert_eq!(back.get_pixel_as_uint64(&[1, 1]).unwrap(), wide);
        assert_eq!(back.label_map::<u64>().unwrap().labels(), vec![wide]);
    }

    #[test]
    fn test_registry_covers_every_pixel_type() {
        let registry = PixelRegistry::global();
        for id in PixelId::ALL {
            for dim in MIN_DIMENSION..=MAX_LABEL_DIMENSION {
                assert!(registry.is_supported(id, dim), "{id} {dim}-D");
                let size = vec![2; dim as usize];
                let image = Image::new(&size, id).unwrap();
                assert_eq!(image.pixel_id().unwrap(), id);
                assert_eq!(image.dimension().unwrap(), dim);
            }
        }
        assert!(!registry.is_supported(PixelId::Unknown, 2));
    }

    #[test]
    fn test_shared_reads_across_threads() {
        let image = ramp_2d(16, 16);
        let clones: Vec<Image> = (0..4).map(|_| image.clone()).collect();

        std::thread::scope(|scope| {
            for (i, clone) in clones.iter().enumerate() {
                let original = &image;
                scope.spawn(move || {
                    let x = i as u32;
                    assert_eq!(clone.get_pixel_as_float32(&[x, 1]).unwrap(), (16 + i) as f32);
                    assert!(clone.shares_data_with(original));
                });
            }
        });

        let mut writer = clones[0].clone();
        std::thread::spawn(move || {
            writer.set_pixel_as_float32(&[0, 0], -1.0).unwrap();
            writer
        })
        .join()
        .unwrap();
        assert_eq!(image.get_pixel_as_float32(&[0, 0]).unwrap(), 0.0);
    }
}
