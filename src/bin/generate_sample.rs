//! Writes a synthetic analysis directory so the dashboard can be exercised
//! without the real pipeline outputs: a latin-1 IPRESS-style CSV, district
//! and populated-center shapefiles, a department Parquet summary, and
//! placeholder map outputs.
//!
//! Usage: `generate_sample [target-dir]` (default `sample_atlas/`).

use std::fs;
use std::path::Path;
use std::sync::Arc;

use arrow::array::{Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use shapefile::dbase::{FieldValue, Record, TableWriterBuilder};
use shapefile::{Point, Polygon, PolygonRing};

const DEPARTMENTS: &[(&str, i64)] = &[
    ("LIMA", 412),
    ("AREQUIPA", 86),
    ("CUSCO", 78),
    ("PIURA", 65),
    ("LA LIBERTAD", 61),
    ("JUNÍN", 54),
    ("LORETO", 37),
    ("MADRE DE DIOS", 9),
];

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let target = args.first().map(String::as_str).unwrap_or("sample_atlas");
    let target = Path::new(target);

    fs::create_dir_all(target.join("data")).expect("creating data dir");
    fs::create_dir_all(target.join("outputs")).expect("creating outputs dir");

    write_ipress_csv(&target.join("data/IPRESS.csv"));
    write_districts_shapefile(&target.join("data/DISTRITOS.shp"));
    write_ccpp_shapefile(&target.join("data/CCPP_IGN100K.shp"));
    write_department_parquet(&target.join("outputs/deptos_enriched.parquet"));
    write_placeholder_maps(&target.join("outputs"));

    println!("Wrote sample analysis directory to {}", target.display());
    println!("Run: salud-atlas {}", target.display());
}

/// The real registry export is latin-1, so the sample is too; the accented
/// names exercise the encoding path.
fn write_ipress_csv(path: &Path) {
    let mut text = String::from("CODIGO,NOMBRE,DEPARTAMENTO,UBIGEO,ESTADO\n");
    let rows = [
        ("00001", "HOSPITAL MARÍA AUXILIADORA", "LIMA", "150133"),
        ("00002", "HOSPITAL SAN JUAN DE DIOS", "AREQUIPA", "040101"),
        ("00003", "CENTRO DE SALUD BELÉN", "LORETO", "160101"),
        ("00004", "POSTA MÉDICA SEÑOR DE LOS MILAGROS", "CUSCO", "080101"),
        ("00005", "HOSPITAL REGIONAL DE PIURA", "PIURA", "200101"),
    ];
    for (code, name, dep, ubigeo) in rows {
        text.push_str(&format!("{code},{name},{dep},{ubigeo},ACTIVO\n"));
    }
    let (bytes, _, _) = encoding_rs::WINDOWS_1252.encode(&text);
    fs::write(path, &bytes).expect("writing IPRESS.csv");
}

fn write_districts_shapefile(path: &Path) {
    let table = TableWriterBuilder::new()
        .add_character_field("IDDIST".try_into().expect("field name"), 6)
        .add_character_field("NOMBDIST".try_into().expect("field name"), 50);
    let mut writer = shapefile::Writer::from_path(path, table).expect("creating shapefile");

    let districts = [
        ("150101", "LIMA", -77.05, -12.05),
        ("160101", "IQUITOS", -73.25, -3.75),
    ];
    for (id, name, lon, lat) in districts {
        // A small square around the district seat; rings are closed.
        let d = 0.2;
        let ring = PolygonRing::Outer(vec![
            Point::new(lon - d, lat - d),
            Point::new(lon - d, lat + d),
            Point::new(lon + d, lat + d),
            Point::new(lon + d, lat - d),
            Point::new(lon - d, lat - d),
        ]);
        let mut record = Record::default();
        record.insert(
            "IDDIST".to_string(),
            FieldValue::Character(Some(id.to_string())),
        );
        record.insert(
            "NOMBDIST".to_string(),
            FieldValue::Character(Some(name.to_string())),
        );
        writer
            .write_shape_and_record(&Polygon::new(ring), &record)
            .expect("writing district");
    }
}

fn write_ccpp_shapefile(path: &Path) {
    let table = TableWriterBuilder::new()
        .add_character_field("NOMCCPP".try_into().expect("field name"), 50);
    let mut writer = shapefile::Writer::from_path(path, table).expect("creating shapefile");

    let centers = [
        ("SAN JUAN DE LURIGANCHO", -77.00, -11.95),
        ("BELÉN", -73.25, -3.77),
        ("NAUTA", -73.58, -4.51),
    ];
    for (name, lon, lat) in centers {
        let mut record = Record::default();
        record.insert(
            "NOMCCPP".to_string(),
            FieldValue::Character(Some(name.to_string())),
        );
        writer
            .write_shape_and_record(&Point::new(lon, lat), &record)
            .expect("writing populated center");
    }
}

fn write_department_parquet(path: &Path) {
    let schema = Arc::new(Schema::new(vec![
        Field::new("NOMBDEP", DataType::Utf8, false),
        Field::new("hospital_count", DataType::Int64, false),
    ]));
    let names = StringArray::from(DEPARTMENTS.iter().map(|(n, _)| *n).collect::<Vec<_>>());
    let counts = Int64Array::from(DEPARTMENTS.iter().map(|(_, c)| *c).collect::<Vec<_>>());
    let batch = RecordBatch::try_new(schema.clone(), vec![Arc::new(names), Arc::new(counts)])
        .expect("building record batch");

    let file = fs::File::create(path).expect("creating parquet file");
    let mut writer = ArrowWriter::try_new(file, schema, None).expect("creating parquet writer");
    writer.write(&batch).expect("writing parquet batch");
    writer.close().expect("closing parquet writer");
}

fn write_placeholder_maps(outputs: &Path) {
    for name in [
        "mapa_nacional.html",
        "mapa_proximidad_Lima.html",
        "mapa_proximidad_Loreto.html",
    ] {
        let html = format!(
            "<!DOCTYPE html><html><head><title>{name}</title></head>\
             <body><p>Placeholder for the pre-rendered map {name}.</p>\
             </body></html>"
        );
        fs::write(outputs.join(name), html).expect("writing html map");
    }

    for name in [
        "mapa_total_hospitales.png",
        "mapa_distritos_sin_hospitales.png",
        "mapa_top_10_distritos.png",
    ] {
        let mut img = image::RgbImage::new(480, 320);
        for (x, y, pixel) in img.enumerate_pixels_mut() {
            let r = (x * 255 / 480) as u8;
            let g = (y * 255 / 320) as u8;
            *pixel = image::Rgb([r, g, 160]);
        }
        img.save(outputs.join(name)).expect("writing png map");
    }
}
