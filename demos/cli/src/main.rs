use std::path::PathBuf;

use anyhow::{bail, Context};
use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand};
use meditrack_api::workflow::{
    load_patients, refresh_dashboard, refresh_history, register_patient, submit_consultation,
};
use meditrack_api::{ApiClient, ApiConfig};
use meditrack_core::{
    bundled_catalog, classify_bmi_text, compute_bmi, format_fecha_larga, is_out_of_range,
    reference_label, split_highlight, CatalogBrowser, ConsultationDraft,
    HistoryBrowser, HistoryFilters, HomeState, NewPatient, VitalField, DEFAULT_PAGE_SIZE,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(
    name = "meditrack-cli",
    about = "Consultorio MediTrack desde la terminal."
)]
struct Cli {
    /// URL base del API (por defecto MEDITRACK_API_URL o http://localhost:8000).
    #[arg(long, global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Pacientes registrados.
    #[command(subcommand)]
    Patients(PatientsCommand),
    /// Historial de consultas con búsqueda y filtros.
    History(HistoryArgs),
    /// Registra una consulta a partir de un borrador JSON.
    Consult {
        /// Archivo JSON con el borrador de la consulta.
        #[arg(long)]
        draft: PathBuf,
        /// Paciente de la consulta; reemplaza al del borrador.
        #[arg(long)]
        patient: Option<i64>,
    },
    /// Busca en el catálogo de medicamentos.
    Catalog {
        query: Option<String>,
        #[arg(long, default_value_t = 1)]
        page: usize,
        #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
        page_size: usize,
    },
    /// Compara un signo vital con su rango de referencia.
    Vitals { field: VitalField, value: String },
    /// Calcula el IMC a partir del peso (kg) y la talla (cm).
    Bmi { weight: String, height: String },
    /// Resumen del día.
    Dashboard {
        /// Día a resumir (AAAA-MM-DD); hoy por defecto.
        #[arg(long)]
        date: Option<NaiveDate>,
    },
}

#[derive(Subcommand, Debug)]
enum PatientsCommand {
    List,
    Add {
        nombre: String,
        #[arg(long)]
        fecha_nacimiento: Option<NaiveDate>,
        #[arg(long)]
        telefono: Option<String>,
        #[arg(long)]
        correo: Option<String>,
    },
}

#[derive(Args, Debug)]
struct HistoryArgs {
    /// Texto libre: motivo, diagnóstico o paciente.
    #[arg(long, default_value = "")]
    search: String,
    #[arg(long)]
    from: Option<NaiveDate>,
    #[arg(long)]
    to: Option<NaiveDate>,
    #[arg(long)]
    patient: Option<i64>,
    #[arg(long, default_value = "")]
    patient_name: String,
    /// Solo consultas con receta.
    #[arg(long)]
    with_prescription: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive("meditrack=info".parse()?))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Catalog {
            query,
            page,
            page_size,
        } => print_catalog(query.as_deref().unwrap_or_default(), page, page_size),
        Command::Vitals { field, value } => {
            let status = if is_out_of_range(field, &value) {
                "fuera de rango"
            } else {
                "normal"
            };
            println!("{}: {value} ({status})", field.label());
            println!("{}", reference_label(field));
            Ok(())
        }
        Command::Bmi { weight, height } => {
            let Some(bmi) = compute_bmi(&weight, &height) else {
                bail!("No se puede calcular el IMC con peso {weight:?} y talla {height:?}");
            };
            let category = classify_bmi_text(&bmi).map(|c| c.label()).unwrap_or_default();
            println!("IMC: {bmi} kg/m² ({category})");
            Ok(())
        }
        command => {
            let config = match cli.api_url {
                Some(url) => ApiConfig::new(url),
                None => ApiConfig::from_env(),
            }
            .context("Configuración del API inválida")?;
            info!(base_url = config.base_url(), "using API");
            run_remote(ApiClient::new(config), command).await
        }
    }
}

async fn run_remote(client: ApiClient, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Patients(PatientsCommand::List) => {
            let mut patients = Vec::new();
            load_patients(&client, &mut patients).await;
            for patient in &patients {
                println!(
                    "{:>5}  {}  {}  {}",
                    patient.id,
                    patient.nombre,
                    patient.telefono_display(),
                    patient.correo_display()
                );
            }
        }
        Command::Patients(PatientsCommand::Add {
            nombre,
            fecha_nacimiento,
            telefono,
            correo,
        }) => {
            let form = NewPatient {
                nombre,
                fecha_nacimiento,
                telefono,
                correo,
            };
            let mut patients = Vec::new();
            let created = register_patient(&client, &mut patients, &form)
                .await
                .context("No se pudo registrar el paciente")?;
            println!("Paciente registrado con id {}", created.id);
        }
        Command::History(args) => {
            let mut browser = HistoryBrowser::default();
            refresh_history(&client, &mut browser).await;
            browser.search_term = args.search;
            browser.filters = HistoryFilters {
                date_from: args.from,
                date_to: args.to,
                patient_id: args.patient,
                patient_name: args.patient_name,
                has_prescription: args.with_prescription,
            };
            let rows = browser.filtered();
            if rows.is_empty() {
                println!("{}", browser.empty_message());
            }
            for consultation in rows {
                println!(
                    "#{} {} | {} | {} | {}",
                    consultation.id,
                    format_fecha_larga(&consultation.fecha),
                    browser.patient_name(consultation.paciente),
                    consultation.motivo,
                    consultation.diagnostico
                );
            }
        }
        Command::Consult { draft, patient } => {
            let data = std::fs::read_to_string(&draft)
                .with_context(|| format!("No se pudo leer el archivo {draft:?}"))?;
            let mut draft: ConsultationDraft =
                serde_json::from_str(&data).context("Borrador de consulta inválido")?;
            if patient.is_some() {
                draft.paciente = patient;
            }
            if draft.imc.trim().is_empty() {
                draft.imc = compute_bmi(&draft.peso, &draft.talla).unwrap_or_default();
            }
            for field in draft.abnormal_vitals() {
                println!(
                    "Aviso: {} fuera de rango ({})",
                    field.label(),
                    reference_label(field)
                );
            }

            let outcome = submit_consultation(&client, &mut draft).await?;
            match (outcome.consultation.id, outcome.document_url) {
                (Some(id), Some(url)) => println!("Consulta {id} guardada. Receta: {url}"),
                (Some(id), None) => println!("Consulta {id} guardada."),
                (None, Some(url)) => println!("Consulta guardada. Receta: {url}"),
                (None, None) => println!("Consulta guardada."),
            }
        }
        Command::Dashboard { date } => {
            let today = date.unwrap_or_else(|| Local::now().date_naive());
            let mut home = HomeState::default();
            refresh_dashboard(&client, &mut home, today).await;
            let stats = home.stats;
            println!("Pacientes registrados: {}", stats.total_patients);
            println!("Consultas del {today}: {}", stats.consultations_today);
            println!("Alertas activas: {}", stats.active_alerts);
            println!("Recetas generadas: {}", stats.prescriptions_generated);
            if stats.shows_alert_banner() {
                println!("¡Atención! Hay {} alertas activas hoy.", stats.active_alerts);
            }
        }
        Command::Catalog { .. } | Command::Vitals { .. } | Command::Bmi { .. } => {}
    }
    Ok(())
}

fn print_catalog(query: &str, page: usize, page_size: usize) -> anyhow::Result<()> {
    let items = bundled_catalog()?;
    let mut browser = CatalogBrowser::with_page_size(page_size);
    browser.set_query(query);
    let first = browser.results(items);
    browser.go_to_page(page, first.total_pages);
    let results = browser.results(items);

    for hit in &results.items {
        let label = match hit.label {
            Some(span) => {
                let (before, matched, after) = split_highlight(&hit.item.label, span);
                format!("{before}[{matched}]{after}")
            }
            None => hit.item.label.clone(),
        };
        println!("{label} - {}", hit.item.descripcion);
    }
    let (first, last) = results.showing_range();
    println!(
        "Mostrando {first}-{last} de {} (página {} de {})",
        results.total_matches,
        results.page,
        results.total_pages.max(1)
    );
    Ok(())
}
