/*
 * @Author       : 老董
 * @Date         : 2026-10-18
 * @Description  : 联合生成对抗模型：一次训练迭代的完整协议
 *
 * 每次迭代严格按以下顺序执行：
 * 1. forward：四次生成器调用（A→B→A，B→A→B），以及分类器对 real_A 与 fake_B 的预测
 *    （fake_B 挤压通道维后显式转移到分类器所在设备）
 * 2. 生成器阶段：冻结两个判别器，计算恒等、对抗、循环、分类损失并反向传播
 * 3. （若本次应用更新）G 优化器 step + 清空梯度
 * 4. 判别器阶段：解冻判别器，经历史缓冲区取样的假图像以detach拷贝送入判别器并反向传播
 * 5. （若本次应用更新）D 优化器 step + 清空梯度
 */

use super::networks::{Discriminator, JointNetworks};
use super::random::{RandomSource, SeededSource};
use super::{GANLoss, ImagePool, ModelError};
use crate::nn::{
    Adam, Graph, GraphError, LrScheduler, Optimizer, ParamGroup, Var, VarLossOps,
    VarShapeOps,
};
use crate::options::{Direction, Placement, TrainOptions};
use crate::tensor::Tensor;
use tracing::{debug, info};

/// `get_current_losses`返回的损失名称及顺序
pub const LOSS_NAMES: [&str; 11] = [
    "G", "Gen", "Cls", "D_A", "G_A", "cycle_A", "idt_A", "D_B", "G_B", "cycle_B", "idt_B",
];

/// 一个训练批次：两个域的体数据`[N, C, D, H, W]`与N个类别标签。
/// `first`/`second`哪个属于域A由`which_direction`决定
#[derive(Debug, Clone)]
pub struct Batch {
    pub first: Tensor,
    pub second: Tensor,
    pub labels: Vec<usize>,
}

/// 本次迭代分类损失所用的分支
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClsBranch {
    /// 分类器在 real_A 上的输出，权重`lambda_cls_A`
    RealA,
    /// 分类器在 fake_B 上的输出，权重`lambda_cls_B`
    FakeB,
}

struct Inputs {
    real_a: Var,
    real_b: Var,
    real_label: Var,
}

struct Generated {
    fake_b: Var,
    rec_a: Var,
    fake_a: Var,
    rec_b: Var,
    label_a: Var,
    label_b: Var,
}

#[derive(Debug, Default, Clone, Copy)]
struct Losses {
    g: f32,
    gen_total: f32,
    cls: f32,
    d_a: f32,
    g_a: f32,
    cycle_a: f32,
    idt_a: f32,
    d_b: f32,
    g_b: f32,
    cycle_b: f32,
    idt_b: f32,
}

pub struct JointGanModel {
    opt: TrainOptions,
    placement: Placement,
    graph: Graph,
    networks: JointNetworks,
    fake_a_pool: ImagePool,
    fake_b_pool: ImagePool,
    criterion_gan: GANLoss,
    optimizer_g: Adam,
    optimizer_d: Adam,
    scheduler_g: LrScheduler,
    scheduler_d: LrScheduler,
    branch_source: Box<dyn RandomSource>,
    inputs: Option<Inputs>,
    generated: Option<Generated>,
    identity: Option<(Var, Var)>,
    losses: Losses,
    last_cls_branch: Option<ClsBranch>,
}

impl JointGanModel {
    /// 校验配置与网络的设备分配，并绑定优化器与学习率调度器
    ///
    /// - G 优化器：生成器参数 @ `lr_G * 0.1`，分类器参数 @ `lr_G`
    /// - D 优化器：两个判别器的参数 @ `lr_D`
    pub fn new(opt: TrainOptions, networks: JointNetworks, graph: Graph) -> Result<Self, ModelError> {
        opt.validate()?;
        let placement = opt.placement();
        let devices = [
            ("生成器", networks.generator.device(), placement.main),
            ("判别器A", networks.discriminator_a.device(), placement.main),
            ("判别器B", networks.discriminator_b.device(), placement.main),
            ("分类器", networks.classifier.device(), placement.classifier),
        ];
        for (role, actual, expected) in devices {
            if actual != expected {
                return Err(ModelError::Misconfigured(format!(
                    "{}位于{}，但gpu_ids要求其位于{}",
                    role, actual, expected
                )));
            }
        }

        let mut optimizer_g = Adam::new(
            vec![
                ParamGroup::new(networks.generator.parameters(), opt.lr_g * 0.1),
                ParamGroup::new(networks.classifier.parameters(), opt.lr_g),
            ],
            opt.beta1,
            0.999,
        );
        let mut optimizer_d = Adam::new(
            vec![ParamGroup::new(
                [
                    networks.discriminator_a.parameters(),
                    networks.discriminator_b.parameters(),
                ]
                .concat(),
                opt.lr_d,
            )],
            opt.beta1,
            0.999,
        );
        let policy = opt.lr_policy()?;
        let scheduler_g = LrScheduler::new(policy, opt.scheduler_config(), &mut optimizer_g)?;
        let scheduler_d = LrScheduler::new(policy, opt.scheduler_config(), &mut optimizer_d)?;

        info!(
            "联合模型初始化完成：主设备{}，分类器设备{}，缓冲区容量{}，学习率策略{:?}",
            placement.main, placement.classifier, opt.pool_size, policy
        );

        Ok(Self {
            placement,
            fake_a_pool: ImagePool::new(opt.pool_size, opt.seed),
            fake_b_pool: ImagePool::new(opt.pool_size, opt.seed.wrapping_add(1)),
            criterion_gan: GANLoss::new(!opt.no_lsgan),
            branch_source: Box::new(SeededSource::new(opt.seed.wrapping_add(2))),
            graph,
            networks,
            optimizer_g,
            optimizer_d,
            scheduler_g,
            scheduler_d,
            inputs: None,
            generated: None,
            identity: None,
            losses: Losses::default(),
            last_cls_branch: None,
            opt,
        })
    }

    pub const fn options(&self) -> &TrainOptions {
        &self.opt
    }

    pub const fn graph(&self) -> &Graph {
        &self.graph
    }

    pub const fn networks(&self) -> &JointNetworks {
        &self.networks
    }

    pub fn fake_a_pool(&self) -> &ImagePool {
        &self.fake_a_pool
    }

    pub fn fake_b_pool(&self) -> &ImagePool {
        &self.fake_b_pool
    }

    /// 替换分类分支的随机源（测试中注入确定序列）
    pub fn set_branch_source(&mut self, source: Box<dyn RandomSource>) {
        self.branch_source = source;
    }

    pub const fn last_cls_branch(&self) -> Option<ClsBranch> {
        self.last_cls_branch
    }

    /// 载入新批次；上一批次产生的中间节点全部释放
    pub fn set_input(&mut self, batch: Batch) -> Result<(), ModelError> {
        let (a, b) = match self.opt.which_direction {
            Direction::AtoB => (batch.first, batch.second),
            Direction::BtoA => (batch.second, batch.first),
        };
        let batch_size = a.shape().first().copied().unwrap_or(0);
        if batch.labels.len() != batch_size {
            return Err(GraphError::ShapeMismatch {
                expected: vec![batch_size],
                got: vec![batch.labels.len()],
                message: "类别标签个数必须等于批次大小".to_string(),
            }
            .into());
        }

        self.generated = None;
        self.identity = None;
        self.inputs = None;
        let released = self.graph.release_intermediates();
        debug!("释放上一批次的{}个中间节点", released);

        let labels = batch.labels.iter().map(|&l| l as f32).collect::<Vec<_>>();
        let main = self.placement.main;
        self.inputs = Some(Inputs {
            real_a: self.graph.input_named(&a, main, "real_A"),
            real_b: self.graph.input_named(&b, main, "real_B"),
            real_label: self.graph.input_named(
                &Tensor::new(&labels, &[labels.len()]),
                self.placement.classifier,
                "real_label",
            ),
        });
        Ok(())
    }

    fn inputs(&self) -> Result<&Inputs, ModelError> {
        self.inputs.as_ref().ok_or(ModelError::NotReady("set_input"))
    }

    fn generated(&self) -> Result<&Generated, ModelError> {
        self.generated.as_ref().ok_or(ModelError::NotReady("forward"))
    }

    pub fn forward(&mut self) -> Result<(), ModelError> {
        let inputs = self.inputs()?;
        let g = &self.networks.generator;
        let fake_b = g.forward(&inputs.real_a, 0.0)?;
        let rec_a = g.forward(&fake_b, 1.0)?;
        let fake_a = g.forward(&inputs.real_b, 1.0)?;
        let rec_b = g.forward(&fake_a, 0.0)?;

        let cls_device = self.placement.classifier;
        let cls = &self.networks.classifier;
        let label_a = cls
            .forward(&inputs.real_a.squeeze(1)?.to_device(cls_device)?)?
            .logits;
        let label_b = cls
            .forward(&fake_b.squeeze(1)?.to_device(cls_device)?)?
            .logits;

        self.generated = Some(Generated {
            fake_b,
            rec_a,
            fake_a,
            rec_b,
            label_a,
            label_b,
        });
        // 恒等映射属于上一次生成器阶段，与本次前向结果不再对应
        self.identity = None;
        Ok(())
    }

    /// 生成器阶段的反向传播（判别器应已冻结）
    pub fn backward_g(&mut self, update_step: usize) -> Result<(), ModelError> {
        let steps = Self::check_update_step(update_step)?;
        let lambda_idt = self.opt.lambda_identity;
        let lambda_a = self.opt.lambda_a;
        let lambda_b = self.opt.lambda_b;
        let branch = if self.branch_source.uniform() >= 0.5 {
            ClsBranch::RealA
        } else {
            ClsBranch::FakeB
        };

        let inputs = self.inputs()?;
        let generated = self.generated()?;
        let g = &self.networks.generator;

        // 恒等损失：G_A 输入 real_B 应原样输出，G_B 输入 real_A 亦然
        let identity = if lambda_idt > 0.0 {
            let idt_a = g.forward(&inputs.real_b, 0.0)?;
            let idt_b = g.forward(&inputs.real_a, 1.0)?;
            let loss_idt_a = idt_a.l1_loss(&inputs.real_b)?.mul_scalar(lambda_b * lambda_idt)?;
            let loss_idt_b = idt_b.l1_loss(&inputs.real_a)?.mul_scalar(lambda_a * lambda_idt)?;
            Some((idt_a, idt_b, loss_idt_a, loss_idt_b))
        } else {
            None
        };

        // 对抗损失 D_A(G_A(A))、D_B(G_B(B))
        let loss_g_a = self
            .criterion_gan
            .evaluate(&self.networks.discriminator_a.forward(&generated.fake_b)?, true)?;
        let loss_g_b = self
            .criterion_gan
            .evaluate(&self.networks.discriminator_b.forward(&generated.fake_a)?, true)?;

        // 循环一致性损失
        let loss_cycle_a = generated.rec_a.l1_loss(&inputs.real_a)?.mul_scalar(lambda_a)?;
        let loss_cycle_b = generated.rec_b.l1_loss(&inputs.real_b)?.mul_scalar(lambda_b)?;

        // 分类损失：每次迭代随机只取一个分支
        let (logits, lambda_cls) = match branch {
            ClsBranch::RealA => (&generated.label_a, self.opt.lambda_cls_a),
            ClsBranch::FakeB => (&generated.label_b, self.opt.lambda_cls_b),
        };
        let loss_cls = logits
            .cross_entropy(&inputs.real_label)?
            .mul_scalar(lambda_cls)?
            .div_scalar(steps)?;

        let mut loss_gen = loss_g_a
            .try_add(&loss_g_b)?
            .try_add(&loss_cycle_a)?
            .try_add(&loss_cycle_b)?;
        if let Some((_, _, loss_idt_a, loss_idt_b)) = &identity {
            loss_gen = loss_gen.try_add(loss_idt_a)?.try_add(loss_idt_b)?;
        }
        let loss_gen = loss_gen.div_scalar(steps)?;

        // 两项位于不同设备，先把生成器一侧的损失转移到分类器设备
        let loss_g = loss_gen
            .to_device(self.placement.classifier)?
            .try_add(&loss_cls)?;
        loss_g.backward()?;

        let (idt_a_value, idt_b_value) = match &identity {
            Some((_, _, a, b)) => (a.item()?, b.item()?),
            None => (0.0, 0.0),
        };
        self.losses = Losses {
            g: loss_g.item()?,
            gen_total: loss_gen.item()?,
            cls: loss_cls.item()?,
            g_a: loss_g_a.item()?,
            g_b: loss_g_b.item()?,
            cycle_a: loss_cycle_a.item()?,
            cycle_b: loss_cycle_b.item()?,
            idt_a: idt_a_value,
            idt_b: idt_b_value,
            ..self.losses
        };
        self.identity = identity.map(|(idt_a, idt_b, _, _)| (idt_a, idt_b));
        self.last_cls_branch = Some(branch);
        Ok(())
    }

    /// 判别器的一次反向传播：真图像目标为真，假图像（历史缓冲区取出的张量拷贝，不连回生成器）目标为假
    fn backward_d_basic(
        &self,
        net_d: &dyn Discriminator,
        real: &Var,
        fake: &Tensor,
        steps: f32,
    ) -> Result<f32, ModelError> {
        let loss_d_real = self.criterion_gan.evaluate(&net_d.forward(real)?, true)?;
        let fake = self.graph.input(fake, self.placement.main);
        let loss_d_fake = self.criterion_gan.evaluate(&net_d.forward(&fake)?, false)?;
        let loss_d = loss_d_real
            .try_add(&loss_d_fake)?
            .mul_scalar(0.5)?
            .div_scalar(steps)?;
        Ok(loss_d.backward()?)
    }

    pub fn backward_d_a(&mut self, update_step: usize) -> Result<(), ModelError> {
        let steps = Self::check_update_step(update_step)?;
        let fake_b = self.generated()?.fake_b.value()?;
        let fake_b = self.fake_b_pool.query(&fake_b);
        let real_b = self.inputs()?.real_b.clone();
        self.losses.d_a =
            self.backward_d_basic(self.networks.discriminator_a.as_ref(), &real_b, &fake_b, steps)?;
        Ok(())
    }

    pub fn backward_d_b(&mut self, update_step: usize) -> Result<(), ModelError> {
        let steps = Self::check_update_step(update_step)?;
        let fake_a = self.generated()?.fake_a.value()?;
        let fake_a = self.fake_a_pool.query(&fake_a);
        let real_a = self.inputs()?.real_a.clone();
        self.losses.d_b =
            self.backward_d_basic(self.networks.discriminator_b.as_ref(), &real_a, &fake_a, steps)?;
        Ok(())
    }

    /// 冻结/解冻两个判别器
    pub fn set_discriminators_trainable(&self, trainable: bool) -> Result<(), ModelError> {
        self.networks.discriminator_a.set_requires_grad(trainable)?;
        self.networks.discriminator_b.set_requires_grad(trainable)?;
        Ok(())
    }

    /// 完整的一次迭代
    ///
    /// `upgate`为false时只累加梯度而不更新参数；
    /// 连续若干次false后再来一次true，即一次应用所有累加的梯度
    pub fn optimize_parameters(&mut self, update_step: usize, upgate: bool) -> Result<(), ModelError> {
        self.forward()?;

        self.set_discriminators_trainable(false)?;
        self.backward_g(update_step)?;
        if upgate {
            self.optimizer_g.step()?;
            self.optimizer_g.zero_grad()?;
        }

        self.set_discriminators_trainable(true)?;
        self.backward_d_a(update_step)?;
        self.backward_d_b(update_step)?;
        if upgate {
            self.optimizer_d.step()?;
            self.optimizer_d.zero_grad()?;
        }

        debug!(
            upgate,
            loss_g = self.losses.g,
            loss_d_a = self.losses.d_a,
            loss_d_b = self.losses.d_b,
            cls_branch = ?self.last_cls_branch,
            "完成一次迭代"
        );
        Ok(())
    }

    /// 不记录梯度的前向计算（推理/可视化用）
    pub fn test(&mut self) -> Result<(), ModelError> {
        let graph = self.graph.clone();
        graph.no_grad_scope(|_| self.forward())
    }

    /// 每个epoch结束调用一次；plateau 策略需要提供指标
    pub fn update_learning_rate(&mut self, metric: Option<f32>) -> Result<(), ModelError> {
        self.scheduler_g.step(&mut self.optimizer_g, metric)?;
        self.scheduler_d.step(&mut self.optimizer_d, metric)?;
        let (lr_g, lr_d) = self.learning_rates();
        info!("学习率更新：G = {:?}，D = {:?}", lr_g, lr_d);
        Ok(())
    }

    /// （G优化器各组学习率，D优化器各组学习率）
    pub fn learning_rates(&self) -> (Vec<f32>, Vec<f32>) {
        (
            self.optimizer_g.learning_rates(),
            self.optimizer_d.learning_rates(),
        )
    }

    /// 最近一次迭代的各项损失，按`LOSS_NAMES`的顺序
    pub fn get_current_losses(&self) -> Vec<(&'static str, f32)> {
        let l = &self.losses;
        let values = [
            l.g, l.gen_total, l.cls, l.d_a, l.g_a, l.cycle_a, l.idt_a, l.d_b, l.g_b, l.cycle_b, l.idt_b,
        ];
        LOSS_NAMES.into_iter().zip(values).collect()
    }

    /// 当前的各张体数据：real_A, fake_B, rec_A, [idt_A], real_B, fake_A, rec_B, [idt_B]
    ///
    /// 恒等映射只有在`lambda_identity > 0`且本次前向之后已完成生成器阶段时才有
    pub fn get_current_visuals(&self) -> Result<Vec<(&'static str, Tensor)>, ModelError> {
        let inputs = self.inputs()?;
        let generated = self.generated()?;
        let mut visuals_a = vec![
            ("real_A", inputs.real_a.value()?),
            ("fake_B", generated.fake_b.value()?),
            ("rec_A", generated.rec_a.value()?),
        ];
        let mut visuals_b = vec![
            ("real_B", inputs.real_b.value()?),
            ("fake_A", generated.fake_a.value()?),
            ("rec_B", generated.rec_b.value()?),
        ];
        if self.opt.lambda_identity > 0.0 {
            if let Some((idt_a, idt_b)) = &self.identity {
                visuals_a.push(("idt_A", idt_a.value()?));
                visuals_b.push(("idt_B", idt_b.value()?));
            }
        }
        visuals_a.extend(visuals_b);
        Ok(visuals_a)
    }

    /// 输出各网络的参数规模
    pub fn log_networks(&self) -> Result<(), ModelError> {
        let nets = [
            ("G", self.networks.generator.parameters()),
            ("D_A", self.networks.discriminator_a.parameters()),
            ("D_B", self.networks.discriminator_b.parameters()),
            ("Cls", self.networks.classifier.parameters()),
        ];
        for (name, params) in nets {
            let mut elements = 0;
            for p in &params {
                elements += p.value()?.size();
            }
            info!(
                "[Network {}] 参数张量{}个，参数总数 : {:.3} M",
                name,
                params.len(),
                elements as f32 / 1e6
            );
        }
        Ok(())
    }

    fn check_update_step(update_step: usize) -> Result<f32, ModelError> {
        if update_step == 0 {
            Err(ModelError::Misconfigured(
                "update_step至少为1".to_string(),
            ))
        } else {
            Ok(update_step as f32)
        }
    }
}
