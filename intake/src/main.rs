use clap::Parser;
use common::jobs::BatchStatus;
use common::requests::CertificateForm;
use env_logger::Env;
use intake::config::{file_name_of, load_profile, BulkArgs, Cli, Command, CreateArgs};
use intake::images::{ImageInput, SourceImage, TesseractReader};
use intake::store::{HttpRecordStore, RecordStore};
use intake::submission::{generate_certificate_number, SubmittableCertificate};
use intake::Wizard;
use log::{info, warn};
use std::error::Error;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init_from_env(Env::default().default_filter_or("info"));
    let cli = Cli::parse();
    let store = HttpRecordStore::new(&cli.server, cli.session_cookie.clone())?;

    match cli.command {
        Command::Bulk(args) => run_bulk(args, &store).await,
        Command::Create(args) => run_create(args, &store).await,
    }
}

async fn run_bulk(args: BulkArgs, store: &HttpRecordStore) -> Result<(), Box<dyn Error>> {
    let mut wizard = Wizard::new(load_profile(args.columns.as_deref())?);

    let sheet = tokio::fs::read(&args.sheet).await?;
    let rows = wizard.load_spreadsheet(&file_name_of(&args.sheet), &sheet)?;
    info!("Found {} certificates in {}", rows, args.sheet.display());

    if !args.images.is_empty() {
        let mut inputs = Vec::with_capacity(args.images.len());
        for path in &args.images {
            let bytes = tokio::fs::read(path).await?;
            inputs.push(ImageInput::classify(file_name_of(path), bytes));
        }
        let reader = TesseractReader::new(&args.tesseract, args.ocr_lang.clone());
        let report = wizard.add_images(inputs, &reader).await?;
        for name in &report.missed {
            warn!("No lab report number read from {}", name);
        }
    }

    println!("Images by lab report:");
    for (report_number, images) in wizard.binding().iter() {
        println!("  {}: {} image(s)", report_number, images.len());
    }
    let unmatched = wizard
        .candidates()
        .iter()
        .filter(|c| wizard.binding().first(c.lab_report_number.trim()).is_none())
        .count();
    println!("  {} row(s) without an image", unmatched);

    if !args.yes && !confirm(rows).await? {
        info!("Bulk upload cancelled");
        return Ok(());
    }

    let (tx, mut rx) = mpsc::channel::<BatchStatus>(100);
    let total = rows;
    let printer = tokio::spawn(async move {
        while let Some(status) = rx.recv().await {
            match status {
                BatchStatus::InProgress(done) => info!("Created {}/{}", done, total),
                BatchStatus::Cleared => info!("Existing certificates cleared"),
                _ => {}
            }
        }
    });

    let result = wizard.submit(store, Some(&tx)).await;
    drop(tx);
    let _ = printer.await;

    let created = result?;
    println!("Created {} certificates.", created.len());
    Ok(())
}

async fn run_create(args: CreateArgs, store: &HttpRecordStore) -> Result<(), Box<dyn Error>> {
    let image = match &args.image {
        Some(path) => Some(SourceImage::new(file_name_of(path), tokio::fs::read(path).await?)),
        None => None,
    };
    let certificate = SubmittableCertificate {
        form: CertificateForm {
            certificate_number: args.number.unwrap_or_else(generate_certificate_number),
            stone_type: args.stone_type,
            carat: args.carat,
            gross_weight: args.gross_weight,
            color: args.color,
            clarity: args.clarity,
            cut: args.cut,
            notes: args.notes,
        },
        image,
    };

    let created = store.create(&certificate).await?;
    println!("Certificate {} published.", created.certificate_number);
    Ok(())
}

async fn confirm(rows: usize) -> std::io::Result<bool> {
    println!(
        "This deletes ALL existing certificates and then creates {} new ones. Continue? [y/N]",
        rows
    );
    let mut answer = String::new();
    BufReader::new(tokio::io::stdin()).read_line(&mut answer).await?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes"))
}
