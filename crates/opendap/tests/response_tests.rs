//! Parsing of complete server responses as the GrADS data server sends them.

use opendap::{hyperslab_constraint, parse_ascii, parse_dds, parse_error_body, DapError};
use wind_common::{Hyperslab, Variable, WindError, EXPECTED_DIMENSIONS};

const DDS_0P25: &str = "Dataset {
    Float64 time[time = 121];
    Float64 lev[lev = 41];
    Float64 lat[lat = 721];
    Float64 lon[lon = 1440];
    Grid {
     ARRAY:
        Float32 hgtprs[time = 121][lev = 41][lat = 721][lon = 1440];
     MAPS:
        Float64 time[time = 121];
        Float64 lev[lev = 41];
        Float64 lat[lat = 721];
        Float64 lon[lon = 1440];
    } hgtprs;
    Grid {
     ARRAY:
        Float32 ugrdprs[time = 121][lev = 41][lat = 721][lon = 1440];
     MAPS:
        Float64 time[time = 121];
        Float64 lev[lev = 41];
        Float64 lat[lat = 721];
        Float64 lon[lon = 1440];
    } ugrdprs;
    Grid {
     ARRAY:
        Float32 vgrdprs[time = 121][lev = 41][lat = 721][lon = 1440];
     MAPS:
        Float64 time[time = 121];
        Float64 lev[lev = 41];
        Float64 lat[lat = 721];
        Float64 lon[lon = 1440];
    } vgrdprs;
} gfs_0p25_1hr_06z;
";

#[test]
fn test_every_variable_has_gfs_dimensions() {
    let dds = parse_dds(DDS_0P25).unwrap();
    for variable in Variable::ALL {
        let decl = dds.get(variable.name()).unwrap();
        assert_eq!(decl.dimension_names(), EXPECTED_DIMENSIONS.to_vec());
        assert_eq!(decl.shape(), vec![121, 41, 721, 1440]);
    }
}

#[test]
fn test_seam_fetch_constraint() {
    // Seam-straddling windows fetch the whole longitude axis.
    let slab = Hyperslab {
        time: 0,
        levels: 0..41,
        lat: 260..281,
        lon: 0..1440,
    };
    assert_eq!(
        hyperslab_constraint(Variable::VWind.name(), &slab).unwrap(),
        "vgrdprs[0:0][0:40][260:280][0:1439]"
    );
}

#[test]
fn test_grid_block_values_in_row_major_order() {
    let body = "\
ugrdprs, [1][1][2][2]
[0][0][0], -1.5, 2.25
[0][0][1], 3.0, -4.75
time, [1]
736645.0
lev, [1]
1000.0
lat, [2]
-33.0, -32.5
lon, [2]
139.0, 139.5
";
    let arrays = parse_ascii(body).unwrap();
    assert_eq!(arrays[0].values, vec![-1.5, 2.25, 3.0, -4.75]);
    assert_eq!(arrays[3].values, vec![-33.0, -32.5]);
}

#[test]
fn test_error_body_is_not_data() {
    let body = "Error {\n    code = 0;\n    message = \"GrADS Data Server: 'gfs20991231' is not an available dataset\";\n};";
    assert!(parse_error_body(body).is_some());
    assert!(parse_ascii(body).is_err());
}

#[test]
fn test_error_conversion() {
    let unavailable: WindError = DapError::NotPublished("x".into()).into();
    assert!(matches!(unavailable, WindError::RemoteUnavailable(_)));

    let server: WindError = DapError::Server {
        status: 500,
        message: "Internal error".into(),
    }
    .into();
    assert!(matches!(server, WindError::RemoteUnavailable(_)));

    let missing: WindError = DapError::MissingVariable("ugrdprs".into()).into();
    assert!(matches!(missing, WindError::RemoteUnavailable(_)));

    let malformed: WindError = DapError::InvalidFormat("x".into()).into();
    assert!(matches!(malformed, WindError::Protocol(ref msg) if msg == "x"));
}
