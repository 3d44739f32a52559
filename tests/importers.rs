//! 카탈로그 CSV 변환과 도시 목록 생성 테스트.
use std::fs;
use std::path::Path;

use thermal_incentive_toolbox::app::{self, AppError};
use thermal_incentive_toolbox::config::Config;
use thermal_incentive_toolbox::importer::{
    self, format_decimal_comma, parse_wrapped_rows, CitySources, ImportError,
};
use thermal_incentive_toolbox::payload::{calculate, CalculationPayload};
use thermal_incentive_toolbox::provider::{CatalogError, CatalogModel, CatalogStore, CityIndex};
use thermal_incentive_toolbox::ui_cli::{BuildCitiesArgs, Command};

const HEAT_PUMP_CSV: &str = "Tipologia,Tipologia funzionamento,Tipologia scambio,\
Denominazione Commerciale,Marca,Modello,Identificativo modello unità esterna,\
Identificativo modello unità interna,Potenza termica [kWt],Presenza inverter,COP,GUE,Emissioni NOx
\"2.A,Elettrica,Aria/Acqua,Linea X,Arquati,HP 8,EXT8,INT8,\"\"8,20\"\",SI,\"\"4,10\"\",,\"
\"2.A,Elettrica,Aria/Acqua,Linea X,Arquati,HP 8,EXT8,INT8,\"\"8,20\"\",SI,\"\"4,10\"\",,\"
\"2.B,Elettrica,Aria/Aria,X,Other,Y,,,\"\"5\"\",NO,\"\"3\"\",,\"

\"2.A,short\"
\"2.A,Elettrica,Acqua-Acqua,,Arquati,HP 12,EXT12,EXT12,12,SI,n/d,,\"
";

const WATER_HEATER_CSV: &str = "\u{feff}Tipologia di intervento,Marca,Modello,\
Identificativo modello unità esterna,Identificativo modello unità interna,\
Potenza termica [kWt],COP,Capacità [litri]
\"2.D,Ariston,Nuos 200,,,\"\"1,5\"\",\"\"3,2\"\",200\"
\"2.D,Ariston,Nuos 80,,,\"\"0,8\"\",\"\"2,9\"\",\"\"80,5\"\"\"
";

const SOLAR_CSV: &str = "Tipologia intervento,Tipologia di collettori,Utilizzo,Marca,Modello,\
Area AG [m2],Area Aa [m2],Energia Qcol (50°C) [kWht/anno],Energia Qcol (75°C) [kWht/anno],\
Energia Qsol (50°C) [kWht/anno],Energia Qsol (75°C) [kWht/anno],\
Energia Qsol (150°C) [kWht/anno],Energia QL [MJ/anno]
\"2.C,Piani vetrati,ACS e riscaldamento,Sole,SP 2,\"\"2,51\"\",\"\"2,30\"\",,\"\"1.250,5\"\",,,,\"
\"2.C,Factory Made,Solo ACS,Sole,FM 1,,,\"\"900\"\",,,,,\"\"4200\"\"\"
";

const HYBRID_CSV: &str = "Tipologia intervento,Marca,Modello pompa di calore,\
Modello caldaia a condensazione,Identificativo modello unità esterna,\
Identificativo modello unità interna,Potenza termica Pompa di Calore [kWt],COP,\
Potenza termica caldaia a condensazione,Rendimento termico utile caldaia,Presenza inverter
\"2.E,Arquati,HY 4,Cond 24,E4,I4,\"\"4,5\"\",\"\"3,75\"\",\"\"24\"\",\"\"98,2\"\",SI\"
";

fn write(path: &Path, content: &str) {
    fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
    fs::write(path, content).expect("write");
}

/// CSV를 써서 가져온 뒤 카탈로그 공급자로 다시 읽는다.
fn import(dir: &Path, class: &str, csv: &str) -> Vec<CatalogModel> {
    let csv_path = dir.join(format!("{class}.csv"));
    write(&csv_path, csv);
    let data_dir = dir.join("data");
    let (count, path) =
        app::import_catalog(&csv_path, class, "arquati", &data_dir).expect("import");
    assert!(path.ends_with(format!("catalog/{class}/arquati.json")));
    let models = CatalogStore::under_data_dir(&data_dir)
        .models(class, "arquati")
        .expect("models");
    assert_eq!(models.len(), count);
    models
}

#[test]
fn wrapped_rows_are_unescaped_and_malformed_lines_skipped() {
    let rows = parse_wrapped_rows(HEAT_PUMP_CSV).expect("rows");
    assert_eq!(rows.len(), 4);
    assert_eq!(rows[0]["Potenza termica [kWt]"], "8,20");
    assert_eq!(rows[0]["COP"], "4,10");
    assert_eq!(rows[3]["Modello"], "HP 12");

    let rows = parse_wrapped_rows(WATER_HEATER_CSV).expect("rows");
    assert_eq!(rows[0]["Tipologia di intervento"], "2.D");
    assert_eq!(rows[1]["Capacità [litri]"], "80,5");

    assert!(matches!(parse_wrapped_rows(""), Err(ImportError::EmptyCsv)));
}

#[test]
fn decimal_comma_formatting() {
    assert_eq!(format_decimal_comma(8.2, 2), "8,20");
    assert_eq!(format_decimal_comma(164.0, 1), "164,0");
    assert_eq!(format_decimal_comma(1250.5, 2), "1250,50");
}

#[test]
fn heat_pump_catalog_from_csv() {
    let dir = tempfile::tempdir().expect("tempdir");
    let models = import(dir.path(), "pompa-calore", HEAT_PUMP_CSV);
    assert_eq!(models.len(), 2);

    let first = &models[0];
    assert_eq!(first.id, Some(serde_json::json!(1)));
    assert_eq!(first.label, "Arquati HP 8 (EXT8/INT8)");
    assert_eq!(first.fields["id"], 1);
    assert_eq!(first.fields["tipologia_funzionamento"], "elettrica");
    assert_eq!(first.fields["tipologia_scambio"], "aria_acqua_bassa");
    assert_eq!(first.fields["potenza_nominale"], "8,20");
    assert_eq!(first.fields["efficienza_stagionale"], "164,0");
    assert_eq!(first.fields["scop_sper_cop"], "4,10");
    assert_eq!(first.fields["potenziale_gwp"], "");

    let second = &models[1];
    assert_eq!(second.id, Some(serde_json::json!(2)));
    assert_eq!(second.label, "Arquati HP 12 (EXT12)");
    assert_eq!(second.fields["tipologia_scambio"], "acqua_acqua");
    assert_eq!(second.fields["potenza_nominale"], "12,00");
    assert_eq!(second.fields["efficienza_stagionale"], "");
    assert_eq!(second.fields["scop_sper_cop"], "n/d");
}

#[test]
fn water_heater_class_inferred_from_cop() {
    let dir = tempfile::tempdir().expect("tempdir");
    let models = import(dir.path(), "scaldacqua", WATER_HEATER_CSV);
    assert_eq!(models.len(), 2);
    assert_eq!(models[0].label, "Ariston Nuos 200");
    assert_eq!(models[0].fields["classe_energetica"], "a+");
    assert_eq!(models[0].fields["capacita_accumulo"], 200);
    assert_eq!(models[1].fields["classe_energetica"], "a");
    assert_eq!(models[1].fields["capacita_accumulo"], 80);
}

#[test]
fn solar_energy_unit_follows_collector_type() {
    let dir = tempfile::tempdir().expect("tempdir");
    let models = import(dir.path(), "solare-termico", SOLAR_CSV);
    assert_eq!(models.len(), 2);

    let flat = &models[0].fields;
    assert_eq!(flat["tipo_collettori"], "piani");
    assert_eq!(flat["utilizzo"], "acs_riscaldamento");
    assert_eq!(flat["area_ag"], "2,51");
    assert_eq!(flat["area_aa"], "2,30");
    assert_eq!(flat["energia_termica"].as_f64(), Some(1250.5));

    let factory = &models[1].fields;
    assert_eq!(factory["tipo_collettori"], "factory_made");
    assert_eq!(factory["utilizzo"], "solo_acs");
    assert_eq!(factory["area_ag"], "");
    assert_eq!(factory["energia_termica"].as_f64(), Some(4200.0));
}

#[test]
fn imported_hybrid_model_computes_like_typed_values() {
    let dir = tempfile::tempdir().expect("tempdir");
    let models = import(dir.path(), "sistema-ibrido", HYBRID_CSV);
    assert_eq!(models.len(), 1);
    let fields = &models[0].fields;
    assert_eq!(models[0].label, "Arquati HY 4 + Cond 24 (E4/I4)");
    assert_eq!(fields["modello"], "Arquati HY 4 + Cond 24 (E4/I4)");
    assert_eq!(fields["pdc_potenza"], "4,50");
    assert_eq!(fields["pdc_efficienza"], "150,0");
    assert_eq!(fields["pdc_scop_sper_cop"], "3,75");
    assert_eq!(fields["caldaia_potenza"], "24,00");
    assert_eq!(fields["caldaia_rendimento"], "98,2");

    let mut from_catalog = CalculationPayload::default();
    from_catalog.add_class("sistema-ibrido");
    from_catalog.set_invoice("sistema-ibrido", 8000.0);
    from_catalog.set_climate_zone("D");
    for (key, value) in fields {
        if let Some(text) = value.as_str() {
            from_catalog.set_field("sistema-ibrido", key, text);
        }
    }

    let mut typed = CalculationPayload::default();
    typed.add_class("sistema-ibrido");
    typed.set_invoice("sistema-ibrido", 8000.0);
    typed.set_climate_zone("D");
    typed.set_field("sistema-ibrido", "pdc_potenza", 4.5);
    typed.set_field("sistema-ibrido", "pdc_efficienza", 150.0);
    typed.set_field("sistema-ibrido", "pdc_scop_sper_cop", 3.75);

    let a = calculate(&from_catalog).data.expect("data");
    let b = calculate(&typed).data.expect("data");
    assert!(a["sistema-ibrido"].incentivo_lordo > 0.0);
    assert_eq!(a["sistema-ibrido"].incentivo_lordo, b["sistema-ibrido"].incentivo_lordo);
}

#[test]
fn catalog_import_errors() {
    let dir = tempfile::tempdir().expect("tempdir");
    let data_dir = dir.path().join("data");
    let csv_path = dir.path().join("hp.csv");
    write(&csv_path, HEAT_PUMP_CSV);

    let err = app::import_catalog(&csv_path, "caldaia", "arquati", &data_dir).unwrap_err();
    assert!(matches!(
        err,
        AppError::Import(ImportError::UnsupportedClass(ref id)) if id == "caldaia"
    ));

    let missing = dir.path().join("missing.csv");
    let err = app::import_catalog(&missing, "pompa-calore", "arquati", &data_dir).unwrap_err();
    assert!(matches!(err, AppError::Import(ImportError::MissingFile(_))));

    let err = app::import_catalog(&csv_path, "pompa-calore", "../x", &data_dir).unwrap_err();
    assert!(matches!(err, AppError::Catalog(CatalogError::InvalidKey(_))));
}

fn write_city_sources(dir: &Path) {
    write(
        &dir.join("opendatasicilia_main.csv"),
        "pro_com_t,comune,den_prov,sigla,den_reg,lat,long\n\
         15146,Milano,Milano,MI,Lombardia,45.46,9.19\n\
         058091,Roma,Roma,RM,Lazio,41.89,12.48\n\
         1001,agliè,Torino,TO,Piemonte,,\n\
         99999,,Nessuna,XX,Nessuna,1,1\n",
    );
    write(
        &dir.join("opendatasicilia_codici_catastali.csv"),
        "pro_com_t,codice_catastale\n015146,F205\n58091,H501\n",
    );
    write(
        &dir.join("opendatasicilia_popolazione_2021.csv"),
        "pro_com_t,pop_res_21\n15146,1371498\n",
    );
}

#[test]
fn cities_merged_by_padded_istat_code() {
    let dir = tempfile::tempdir().expect("tempdir");
    write_city_sources(dir.path());
    let cities = importer::build_cities(&CitySources::in_dir(dir.path())).expect("cities");

    let names: Vec<&str> = cities.iter().map(|c| c.comune.as_str()).collect();
    assert_eq!(names, ["agliè", "Milano", "Roma"]);

    let milano = &cities[1];
    assert_eq!(milano.codice_belfiore, "F205");
    assert_eq!(milano.abitanti, "1371498");
    assert_eq!(milano.codice_provincia, "MI");
    assert_eq!(milano.lat, Some(45.46));
    assert_eq!(milano.zona_climatica, None);
    assert_eq!(milano.stato, "Italia");

    assert_eq!(cities[2].codice_belfiore, "H501");
    assert_eq!(cities[2].abitanti, "");
    assert_eq!(cities[0].lat, None);
    assert_eq!(cities[0].lng, None);
}

#[test]
fn missing_city_source_is_reported() {
    let dir = tempfile::tempdir().expect("tempdir");
    write_city_sources(dir.path());
    fs::remove_file(dir.path().join("opendatasicilia_popolazione_2021.csv")).expect("rm");
    let err = importer::build_cities(&CitySources::in_dir(dir.path())).unwrap_err();
    assert!(matches!(err, ImportError::MissingFile(_)));
}

#[tokio::test]
async fn build_cities_command_feeds_city_search() {
    let dir = tempfile::tempdir().expect("tempdir");
    let data_dir = dir.path().join("data");
    write_city_sources(&data_dir.join("sources"));

    let mut cfg = Config::default();
    cfg.server.data_dir = data_dir.clone();
    app::run(&mut cfg, Command::BuildCities(BuildCitiesArgs::default()))
        .await
        .expect("build");

    let raw: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(data_dir.join("geo/cities.json")).expect("read"))
            .expect("json");
    assert_eq!(raw[1]["zona_climatica"], serde_json::Value::Null);
    assert_eq!(raw[1]["codice_stato"], "IT");

    let index = CityIndex::load(&data_dir).expect("load");
    assert_eq!(index.len(), 3);
    assert_eq!(index.search("mil", 5)[0].regione, "Lombardia");
    assert_eq!(index.resolve_zone("Milano", Some("MI")), None);
}
