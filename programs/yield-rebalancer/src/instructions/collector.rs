use anchor_lang::prelude::*;
use anchor_spl::token::Token;

use crate::{
    constants::*,
    custody::{require_vault_token_account, vault_token_address, VaultSigner},
    errors::*,
    events::*,
    providers::read_token_account,
    state::*,
};

/// Create the global fee collector
#[derive(Accounts)]
pub struct InitializeCollector<'info> {
    #[account(mut)]
    pub admin: Signer<'info>,

    #[account(
        init,
        payer = admin,
        space = FeeCollector::SPACE,
        seeds = [FEE_COLLECTOR_SEED],
        bump
    )]
    pub fee_collector: Account<'info, FeeCollector>,

    pub system_program: Program<'info, System>,
}

/// Register, retune or drop a vault
#[derive(Accounts)]
pub struct ManageCollector<'info> {
    pub admin: Signer<'info>,

    #[account(
        mut,
        seeds = [FEE_COLLECTOR_SEED],
        bump = fee_collector.bump,
        has_one = admin @ VaultError::Unauthorized,
    )]
    pub fee_collector: Account<'info, FeeCollector>,

    #[account(
        seeds = [VAULT_SEED, vault_state.asset_mint.as_ref()],
        bump = vault_state.bump,
    )]
    pub vault_state: Account<'info, VaultState>,
}

/// Sweep one vault's idle balance to its treasury
#[derive(Accounts)]
pub struct CollectFees<'info> {
    /// Anyone may trigger a due collection
    pub caller: Signer<'info>,

    #[account(
        mut,
        seeds = [FEE_COLLECTOR_SEED],
        bump = fee_collector.bump,
    )]
    pub fee_collector: Account<'info, FeeCollector>,

    #[account(
        seeds = [VAULT_SEED, vault_state.asset_mint.as_ref()],
        bump = vault_state.bump,
    )]
    pub vault_state: Box<Account<'info, VaultState>>,

    /// CHECK: PDA used as authority, validated by seeds
    #[account(
        seeds = [VAULT_AUTHORITY_SEED, vault_state.asset_mint.as_ref()],
        bump = vault_state.authority_bump,
    )]
    pub vault_authority: UncheckedAccount<'info>,

    /// CHECK: the vault authority's associated asset account, re-checked in `sweep`
    #[account(
        mut,
        address = vault_token_address(&vault_authority.key(), &vault_state.asset_mint) @ VaultError::InvalidVaultTokenAccount,
    )]
    pub vault_token_account: UncheckedAccount<'info>,

    /// CHECK: validated as a treasury asset account in `sweep`
    #[account(mut)]
    pub treasury_token_account: UncheckedAccount<'info>,

    pub token_program: Program<'info, Token>,
}

/// Sweep many vaults in one transaction
///
/// Remaining accounts, per vault: vault_state, vault_authority,
/// vault_token_account, treasury_token_account.
#[derive(Accounts)]
pub struct CollectAllFees<'info> {
    pub caller: Signer<'info>,

    #[account(
        mut,
        seeds = [FEE_COLLECTOR_SEED],
        bump = fee_collector.bump,
    )]
    pub fee_collector: Account<'info, FeeCollector>,

    pub token_program: Program<'info, Token>,
}

pub fn initialize_handler(ctx: Context<InitializeCollector>) -> Result<()> {
    let fee_collector = &mut ctx.accounts.fee_collector;
    fee_collector.admin = ctx.accounts.admin.key();
    fee_collector.entries = Vec::new();
    fee_collector.bump = ctx.bumps.fee_collector;
    Ok(())
}

pub fn register_handler(ctx: Context<ManageCollector>, interval: i64) -> Result<()> {
    let vault = ctx.accounts.vault_state.key();
    ctx.accounts.fee_collector.register_vault(vault, interval)?;

    emit!(VaultRegistered {
        vault,
        interval,
        timestamp: Clock::get()?.unix_timestamp,
    });
    Ok(())
}

pub fn update_interval_handler(ctx: Context<ManageCollector>, interval: i64) -> Result<()> {
    let vault = ctx.accounts.vault_state.key();
    ctx.accounts.fee_collector.update_interval(&vault, interval)?;

    emit!(CollectionIntervalUpdated {
        vault,
        interval,
        timestamp: Clock::get()?.unix_timestamp,
    });
    Ok(())
}

pub fn unregister_handler(ctx: Context<ManageCollector>) -> Result<()> {
    let vault = ctx.accounts.vault_state.key();
    ctx.accounts.fee_collector.unregister_vault(&vault)?;

    emit!(VaultUnregistered {
        vault,
        timestamp: Clock::get()?.unix_timestamp,
    });
    Ok(())
}

pub fn collect_handler(ctx: Context<CollectFees>) -> Result<()> {
    let now = Clock::get()?.unix_timestamp;
    let vault_key = ctx.accounts.vault_state.key();
    let vault_state: &VaultState = &ctx.accounts.vault_state;
    let token_program = ctx.accounts.token_program.to_account_info();
    let vault_authority = ctx.accounts.vault_authority.to_account_info();
    let vault_token_account = ctx.accounts.vault_token_account.to_account_info();
    let treasury_token_account = ctx.accounts.treasury_token_account.to_account_info();

    ctx.accounts.fee_collector.collect(&vault_key, now, || {
        sweep(
            vault_key,
            vault_state,
            &token_program,
            &vault_authority,
            &vault_token_account,
            &treasury_token_account,
            now,
        )
    })?;
    Ok(())
}

pub fn collect_all_handler<'info>(ctx: Context<'_, '_, 'info, 'info, CollectAllFees<'info>>) -> Result<()> {
    let now = Clock::get()?.unix_timestamp;
    let token_program = ctx.accounts.token_program.to_account_info();
    let groups: Vec<&[AccountInfo<'info>]> = ctx
        .remaining_accounts
        .chunks(COLLECT_ACCOUNTS_PER_VAULT)
        .collect();
    let vaults: Vec<Pubkey> = groups.iter().map(|group| *group[0].key).collect();

    let report = ctx
        .accounts
        .fee_collector
        .collect_all(&vaults, now, |index, vault| {
            sweep_group(*vault, groups[index], &token_program, now)
        });

    msg!(
        "Fee collection: {} vaults swept, {} skipped",
        report.collected.len(),
        report.skipped.len()
    );
    Ok(())
}

/// Validates one remaining-accounts group and sweeps it
fn sweep_group<'info>(
    vault_key: Pubkey,
    group: &[AccountInfo<'info>],
    token_program: &AccountInfo<'info>,
    now: i64,
) -> Result<u64> {
    let [vault_info, vault_authority, vault_token_account, treasury_token_account] = group else {
        return err!(VaultError::MissingAccount);
    };

    require_keys_eq!(*vault_info.owner, crate::ID, VaultError::InvalidOwner);
    let vault_state = {
        let data = vault_info.try_borrow_data()?;
        VaultState::try_deserialize(&mut &data[..])?
    };

    let expected_vault = Pubkey::create_program_address(
        &[VAULT_SEED, vault_state.asset_mint.as_ref(), &[vault_state.bump]],
        &crate::ID,
    )
    .map_err(|_| error!(VaultError::InvalidVaultAuthority))?;
    require_keys_eq!(vault_key, expected_vault, VaultError::InvalidVaultAuthority);

    require_keys_eq!(
        *vault_authority.key,
        vault_state.vault_authority()?,
        VaultError::InvalidVaultAuthority
    );

    sweep(
        vault_key,
        &vault_state,
        token_program,
        vault_authority,
        vault_token_account,
        treasury_token_account,
        now,
    )
}

/// Moves the vault's whole idle asset balance to its treasury
///
/// Between operations that balance holds only retained withdraw fees.
fn sweep<'info>(
    vault_key: Pubkey,
    vault_state: &VaultState,
    token_program: &AccountInfo<'info>,
    vault_authority: &AccountInfo<'info>,
    vault_token_account: &AccountInfo<'info>,
    treasury_token_account: &AccountInfo<'info>,
    now: i64,
) -> Result<u64> {
    require_vault_token_account(vault_token_account.key, vault_authority.key, &vault_state.asset_mint)?;
    let idle = read_token_account(vault_token_account)?;
    require_keys_eq!(idle.mint, vault_state.asset_mint, VaultError::InvalidMint);
    require_keys_eq!(idle.owner, *vault_authority.key, VaultError::InvalidOwner);

    let treasury = read_token_account(treasury_token_account)?;
    require_keys_eq!(treasury.mint, vault_state.asset_mint, VaultError::InvalidMint);
    require_keys_eq!(treasury.owner, vault_state.treasury, VaultError::InvalidOwner);

    let amount = idle.amount;
    if amount > 0 {
        let asset_mint = vault_state.asset_mint;
        let authority_bump = [vault_state.authority_bump];
        let authority_seeds: &[&[u8]] = &[VAULT_AUTHORITY_SEED, asset_mint.as_ref(), &authority_bump];
        let signer_seeds = &[authority_seeds];

        let signer = VaultSigner {
            token_program: token_program.clone(),
            vault_token_account: vault_token_account.clone(),
            vault_authority: vault_authority.clone(),
            signer_seeds,
        };
        signer.transfer(vault_token_account, treasury_token_account, amount)?;
    }

    emit!(FeesCollected {
        vault: vault_key,
        treasury: vault_state.treasury,
        amount,
        timestamp: now,
    });
    Ok(amount)
}
