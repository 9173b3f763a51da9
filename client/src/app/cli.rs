use clap::{Parser, Subcommand};

use crate::enquiry::{DateFilter, EnquiryStatus};

#[derive(Parser)]
#[command(name = "gymadmin")]
#[command(about = "Gym owner administration client", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Log in with a registered mobile number (prompts for the password)
    Login {
        /// Registered mobile number
        mobile_number: String,
    },
    /// Clear the stored session
    Logout,
    /// Show the stored session identity
    Whoami,
    /// Manage sales enquiries
    Enquiry {
        #[command(subcommand)]
        command: EnquiryCommand,
    },
}

#[derive(Subcommand)]
pub enum EnquiryCommand {
    /// List enquiries for this gym
    List {
        /// Show the completed partition (Joined/Rejected) instead of pending
        #[arg(long)]
        completed: bool,

        /// Case-insensitive substring match on name or contact
        #[arg(short, long)]
        search: Option<String>,

        /// Restrict by creation date: today, week or month
        #[arg(short, long)]
        date: Option<DateFilter>,

        /// Restrict to one status
        #[arg(long)]
        status: Option<EnquiryStatus>,
    },
    /// Record a new enquiry (starts as Pending)
    Add {
        name: String,
        contact: String,
        #[arg(short, long)]
        email: Option<String>,
        #[arg(short, long)]
        message: Option<String>,
    },
    /// Move an enquiry to a new status with a reason
    SetStatus {
        enquiry_id: String,
        status: EnquiryStatus,
        #[arg(short, long)]
        reason: String,
    },
    /// Show the reason choices for a target status
    Reasons { status: EnquiryStatus },
}
